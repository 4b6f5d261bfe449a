use serde::{Deserialize, Serialize};
use thiserror::Error;

use booking_cell::BookingError;
use shared_models::error::AppError;

/// Largest charge the processor accepts, in minor units.
pub const MAX_AMOUNT_MINOR: i64 = 99_999_999;

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentRequest {
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// The subset of a Stripe PaymentIntent object this service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorBody {
    pub error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment processing is not configured")]
    NotConfigured,

    #[error("Invalid price: {0}")]
    InvalidAmount(String),

    #[error("Payment processor error: {message}")]
    Processor { message: String },

    #[error("Payment processor unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Booking(#[from] BookingError),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidAmount(_) => AppError::BadRequest(err.to_string()),
            PaymentError::NotConfigured
            | PaymentError::Processor { .. }
            | PaymentError::Transport(_) => AppError::ExternalService(err.to_string()),
            PaymentError::Booking(booking) => booking.into(),
        }
    }
}

/// Converts a price in major units to the processor's minor units,
/// rounding to the nearest cent.
pub fn to_minor_units(price: f64) -> Result<i64, PaymentError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(PaymentError::InvalidAmount(price.to_string()));
    }

    let amount = (price * 100.0).round();
    if amount < 1.0 || amount > MAX_AMOUNT_MINOR as f64 {
        return Err(PaymentError::InvalidAmount(price.to_string()));
    }

    Ok(amount as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(50.0).unwrap(), 5000);
        assert_eq!(to_minor_units(19.99).unwrap(), 1999);
        assert_eq!(to_minor_units(10.5).unwrap(), 1050);
    }

    #[test]
    fn test_to_minor_units_rejects_bad_prices() {
        assert_matches!(to_minor_units(0.0), Err(PaymentError::InvalidAmount(_)));
        assert_matches!(to_minor_units(-5.0), Err(PaymentError::InvalidAmount(_)));
        assert_matches!(to_minor_units(f64::NAN), Err(PaymentError::InvalidAmount(_)));
        assert_matches!(to_minor_units(f64::INFINITY), Err(PaymentError::InvalidAmount(_)));
        assert_matches!(to_minor_units(0.001), Err(PaymentError::InvalidAmount(_)));
        assert_matches!(to_minor_units(1e12), Err(PaymentError::InvalidAmount(_)));
    }

    #[test]
    fn test_error_status_mapping() {
        let err: AppError = PaymentError::InvalidAmount("0".into()).into();
        assert_matches!(err, AppError::BadRequest(_));

        let err: AppError = PaymentError::Processor { message: "card_declined".into() }.into();
        assert_matches!(err, AppError::ExternalService(_));
    }
}
