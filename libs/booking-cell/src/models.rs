use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::DbError;
use shared_models::error::AppError;
use shared_utils::validation::is_valid_email;

/// A patient's reservation of one slot for one treatment on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub patient: String,
    pub patient_email: String,
    pub date: NaiveDate,
    pub slot: String,
    pub treatment: String,
    pub price: Option<f64>,
    pub paid: bool,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row shape of the `bookings` table.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub patient: String,
    pub patient_email: String,
    pub date: NaiveDate,
    pub slot: String,
    pub treatment: String,
    pub price: Option<f64>,
    pub paid: Option<bool>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookingRecord> for Booking {
    fn from(record: BookingRecord) -> Self {
        Self {
            id: record.id,
            patient: record.patient,
            patient_email: record.patient_email,
            date: record.date,
            slot: record.slot,
            treatment: record.treatment,
            price: record.price,
            paid: record.paid.unwrap_or(false),
            transaction_id: record.transaction_id,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub patient: String,
    pub patient_email: String,
    pub date: NaiveDate,
    pub slot: String,
    pub treatment: String,
    pub price: Option<f64>,
}

impl NewBooking {
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.patient.trim().is_empty() {
            return Err(BookingError::ValidationError("patient is required".to_string()));
        }
        if !is_valid_email(&self.patient_email) {
            return Err(BookingError::ValidationError("patientEmail must be an email address".to_string()));
        }
        if self.treatment.trim().is_empty() || self.slot.trim().is_empty() {
            return Err(BookingError::ValidationError("treatment and slot are required".to_string()));
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(BookingError::ValidationError("price must be a non-negative number".to_string()));
            }
        }
        Ok(())
    }
}

/// `created` is false when the patient already holds a booking for the same
/// treatment and date; `booking` is then the existing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    pub created: bool,
    pub booking: Booking,
}

#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidRequest {
    pub transaction_id: String,
    pub amount: Option<f64>,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Booking {0} not found")]
    NotFound(Uuid),

    #[error("{slot} for {treatment} on {date} is already booked")]
    SlotTaken { treatment: String, date: NaiveDate, slot: String },

    #[error("Booking {0} is already paid")]
    AlreadyPaid(Uuid),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(_) => AppError::NotFound(err.to_string()),
            BookingError::SlotTaken { .. } | BookingError::AlreadyPaid(_) => {
                AppError::Conflict(err.to_string())
            }
            BookingError::ValidationError(msg) => AppError::ValidationError(msg),
            BookingError::Database(db) => db.into(),
        }
    }
}
