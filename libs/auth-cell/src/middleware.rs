use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_models::error::AppError;
use shared_utils::extractor::extract_identity;
use shared_utils::AppState;

use crate::services::AccessControl;

/// Admin gate. Must run after `auth_middleware`, which supplies the Identity.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = extract_identity(&request)?;

    AccessControl::new(state.db.clone())
        .authorize_admin(&identity)
        .await?;

    Ok(next.run(request).await)
}
