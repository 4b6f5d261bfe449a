use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::Identity;
use shared_models::error::AppError;
use shared_utils::AppState;

use crate::models::{Booking, BookingQuery, CreateBookingResponse, MarkPaidRequest, NewBooking};
use crate::services::{BookingService, confirmation_email};

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewBooking>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    let service = BookingService::new(state.db.clone());

    let response = service.create_booking(request).await?;

    // Confirmation goes out in the background; delivery problems never
    // reach the caller.
    if response.created {
        state.mailer.dispatch(confirmation_email(&response.booking));
    }

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    if !identity.is_self(&query.email) {
        debug!("{} attempted to list bookings of {}", identity.email, query.email);
        return Err(AppError::Forbidden("Forbidden Access".to_string()));
    }

    let service = BookingService::new(state.db.clone());
    let bookings = service.find_by_patient(&query.email).await?;

    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn mark_paid(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<MarkPaidRequest>,
) -> Result<Json<Booking>, AppError> {
    let service = BookingService::new(state.db.clone());

    let booking = service.find_by_id(booking_id).await?;
    if !identity.is_self(&booking.patient_email) {
        return Err(AppError::Forbidden("Forbidden Access".to_string()));
    }

    let updated = service.mark_paid(&booking, request).await?;

    Ok(Json(updated))
}
