use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
    body::Body,
};

use shared_models::auth::Identity;
use shared_models::error::AppError;

use crate::jwt::validate_token;
use crate::state::AppState;

/// Pulls the bearer token out of the headers.
///
/// A missing header is `Auth` (401); a header that is present but not a
/// usable bearer credential is `Forbidden` (403).
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Unauthorized Access".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Forbidden("Invalid authorization header format".to_string()))?;

    match auth_value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::Forbidden("Invalid authorization header format".to_string())),
    }
}

// Verifies the credential and stores the caller's Identity in the request extensions
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;

    let identity = validate_token(token, &state.config.jwt_secret)
        .map_err(AppError::Forbidden)?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

pub fn extract_identity<B>(request: &Request<B>) -> Result<Identity, AppError> {
    request
        .extensions()
        .get::<Identity>()
        .cloned()
        .ok_or_else(|| AppError::Auth("Identity not found in request extensions".to_string()))
}
