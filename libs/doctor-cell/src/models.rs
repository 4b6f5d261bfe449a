use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub img: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Row shape of the `doctors` table.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub specialty: String,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<DoctorRecord> for Doctor {
    fn from(record: DoctorRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            specialty: record.specialty,
            img: record.img,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub specialty: String,
    #[serde(default)]
    pub img: Option<String>,
}

impl NewDoctor {
    pub fn validate(&self) -> Result<(), DoctorError> {
        if self.name.trim().is_empty() {
            return Err(DoctorError::ValidationError("name is required".to_string()));
        }
        if self.specialty.trim().is_empty() {
            return Err(DoctorError::ValidationError("specialty is required".to_string()));
        }
        auth_cell::validate_email(&self.email)
            .map_err(|e| DoctorError::ValidationError(e.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor with email {0} already exists")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::AlreadyExists(_) => AppError::Conflict(err.to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::Database(db) => db.into(),
        }
    }
}
