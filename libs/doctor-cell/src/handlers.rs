use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{DeleteResponse, Doctor, NewDoctor};
use crate::services::DoctorService;

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctors = DoctorService::new(state.db.clone()).list_doctors().await?;
    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewDoctor>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = DoctorService::new(state.db.clone()).create_doctor(request).await?;
    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = DoctorService::new(state.db.clone()).delete_doctor(&email).await?;
    Ok(Json(DeleteResponse { deleted }))
}
