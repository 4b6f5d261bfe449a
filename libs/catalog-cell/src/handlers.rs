use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{AvailabilityQuery, AvailabilityView, Service, ServiceSummary};
use crate::services::{AvailabilityService, CatalogService};

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceSummary>>, AppError> {
    let catalog = CatalogService::new(state.db.clone());
    let services = catalog.list_service_summaries().await?;

    Ok(Json(services))
}

#[axum::debug_handler]
pub async fn list_services_full(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let catalog = CatalogService::new(state.db.clone());
    let services = catalog.list_services().await?;

    Ok(Json(services))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<AvailabilityView>>, AppError> {
    let availability = AvailabilityService::new(state.db.clone());
    let views = availability.availability_on(query.date).await?;

    Ok(Json(views))
}
