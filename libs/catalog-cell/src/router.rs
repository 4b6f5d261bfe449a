use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use shared_utils::AppState;

use crate::handlers;

pub fn catalog_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/services", get(handlers::list_services))
        .route("/services/all", get(handlers::list_services_full))
        .route("/available", get(handlers::get_availability))
        .with_state(state)
}
