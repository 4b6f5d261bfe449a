use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
    middleware,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn booking_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/booking", post(handlers::create_booking));

    // Self-only: the caller must own the bookings they touch
    let protected_routes = Router::new()
        .route("/booking", get(handlers::list_bookings))
        .route("/booking/{id}", patch(handlers::mark_paid))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
