use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get},
    middleware,
};

use auth_cell::require_admin;
use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

/// Doctor management. Every route is admin-only.
pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/doctors", get(handlers::list_doctors).post(handlers::create_doctor))
        .route("/doctor/{email}", delete(handlers::delete_doctor))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
