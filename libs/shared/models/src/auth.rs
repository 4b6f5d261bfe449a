use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Payload of the credentials this service issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// The caller behind a verified credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub issued_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn from_claims(claims: JwtClaims) -> Self {
        Self {
            email: claims.email,
            issued_at: Utc.timestamp_opt(claims.iat, 0).single(),
        }
    }

    /// True iff this identity is the owner of `email`.
    pub fn is_self(&self, email: &str) -> bool {
        self.email == email
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Patient,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
