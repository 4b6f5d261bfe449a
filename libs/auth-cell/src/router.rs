use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
    middleware,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;
use crate::middleware::require_admin;

pub fn auth_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/user/{email}", put(handlers::upsert_user));

    let protected_routes = Router::new()
        .route("/admin/{email}", get(handlers::get_admin_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Layers run outside-in: authentication first, then the role check
    let admin_routes = Router::new()
        .route("/user/admin/{email}", put(handlers::grant_admin))
        .route("/users", get(handlers::list_users).delete(handlers::delete_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .with_state(state)
}
