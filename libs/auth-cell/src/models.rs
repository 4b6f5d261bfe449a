use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DbError;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::validation::is_valid_email;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub role: Role,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Row shape of the `users` table.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            email: record.email,
            role: record.role.unwrap_or_default(),
            name: record.name,
            phone: record.phone,
            photo_url: record.photo_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Profile fields a user may set on their own record. There is no role
/// here; roles only change through an admin grant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserResponse {
    pub result: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminStatus {
    pub admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserEmailQuery {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound(err.to_string()),
            UserError::InvalidEmail(_) => AppError::BadRequest(err.to_string()),
            UserError::Database(db) => db.into(),
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), UserError> {
    if !is_valid_email(email) {
        return Err(UserError::InvalidEmail(email.to_string()));
    }
    Ok(())
}
