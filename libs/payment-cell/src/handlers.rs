use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use uuid::Uuid;

use booking_cell::{Booking, BookingService};
use shared_models::auth::Identity;
use shared_models::error::AppError;

use crate::models::{to_minor_units, PaymentError, PaymentIntentRequest, PaymentIntentResponse};
use crate::router::PaymentState;

#[axum::debug_handler]
pub async fn create_payment_intent(
    State(state): State<Arc<PaymentState>>,
    Json(request): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    let amount = to_minor_units(request.price)?;

    let stripe = state.stripe.as_ref().ok_or(PaymentError::NotConfigured)?;
    let intent = stripe.create_payment_intent(amount).await?;

    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// Booking shown on the payment page. Only its owner may see it.
#[axum::debug_handler]
pub async fn get_payment(
    State(state): State<Arc<PaymentState>>,
    Extension(identity): Extension<Identity>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = BookingService::new(state.app.db.clone())
        .find_by_id(booking_id)
        .await
        .map_err(PaymentError::from)?;

    if !identity.is_self(&booking.patient_email) {
        return Err(AppError::Forbidden("Forbidden Access".to_string()));
    }

    Ok(Json(booking))
}
