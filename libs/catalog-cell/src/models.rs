use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use booking_cell::BookingError;
use shared_database::DbError;
use shared_models::error::AppError;

/// A treatment offering with its fixed list of time slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slots: Vec<String>,
    pub price: Option<f64>,
}

/// Name-only projection used by the lightweight listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: i64,
    pub name: String,
}

/// A service as seen on one date: `slots` still open, `booked` taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityView {
    pub id: i64,
    pub name: String,
    pub price: Option<f64>,
    pub slots: Vec<String>,
    pub booked: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Booking(#[from] BookingError),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Database(db) => db.into(),
            CatalogError::Booking(booking) => booking.into(),
        }
    }
}
