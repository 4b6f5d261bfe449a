use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use tracing::{debug, error};

use shared_models::auth::Identity;
use shared_models::error::AppError;
use shared_utils::jwt::issue_token;
use shared_utils::AppState;

use crate::models::{
    AdminStatus, DeleteResponse, UpsertUserResponse, User, UserEmailQuery, UserProfile,
};
use crate::services::{AccessControl, UserService};

/// Registers or refreshes the user and hands back a fresh credential.
#[axum::debug_handler]
pub async fn upsert_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    profile: Option<Json<UserProfile>>,
) -> Result<Json<UpsertUserResponse>, AppError> {
    let profile = profile.map(|Json(p)| p).unwrap_or_default();
    let service = UserService::new(state.db.clone());

    let user = service.upsert_user(&email, profile).await?;

    let token = issue_token(&user.email, &state.config.jwt_secret, state.config.token_ttl_hours)
        .map_err(|e| {
            error!("Failed to issue token for {}: {}", user.email, e);
            AppError::Internal("Failed to issue token".to_string())
        })?;

    Ok(Json(UpsertUserResponse {
        result: user,
        token: token.token,
        expires_at: token.expires_at,
    }))
}

#[axum::debug_handler]
pub async fn get_admin_status(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>, AppError> {
    if !identity.is_self(&email) {
        debug!("{} asked for admin status of {}", identity.email, email);
        return Err(AppError::Forbidden("Forbidden Access".to_string()));
    }

    let admin = AccessControl::new(state.db.clone()).is_admin(&email).await?;

    Ok(Json(AdminStatus { admin }))
}

#[axum::debug_handler]
pub async fn grant_admin(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<User>, AppError> {
    let service = UserService::new(state.db.clone());
    let user = service.grant_admin(&email).await?;

    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::new(state.db.clone()).list_users().await?;

    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserEmailQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = UserService::new(state.db.clone())
        .delete_user(&query.email)
        .await?;

    Ok(Json(DeleteResponse { deleted }))
}
