use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_database::{eq_filter, prefer_headers, DbError, SupabaseClient};

use crate::models::{Doctor, DoctorError, DoctorRecord, NewDoctor};

pub struct DoctorService {
    supabase: Arc<SupabaseClient>,
}

impl DoctorService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        let rows: Vec<DoctorRecord> = self.supabase
            .select("/rest/v1/doctors?order=name.asc")
            .await?;

        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    /// Adds a doctor. The unique index on `email` rejects duplicates.
    pub async fn create_doctor(&self, request: NewDoctor) -> Result<Doctor, DoctorError> {
        request.validate()?;
        debug!("Creating doctor profile for: {}", request.email);

        let doctor_data = json!({
            "name": request.name.trim(),
            "email": request.email,
            "specialty": request.specialty.trim(),
            "img": request.img,
            "created_at": Utc::now().to_rfc3339()
        });

        let rows: Vec<DoctorRecord> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/doctors",
            Some(doctor_data),
            Some(prefer_headers("return=representation")),
        ).await.map_err(|e| match e {
            DbError::Conflict(_) => DoctorError::AlreadyExists(request.email.clone()),
            other => DoctorError::Database(other),
        })?;

        let doctor = rows.into_iter()
            .next()
            .map(Doctor::from)
            .ok_or_else(|| DoctorError::Database(DbError::Api {
                status: 500,
                message: "insert returned no row".to_string(),
            }))?;

        info!("Doctor {} added ({})", doctor.id, doctor.email);
        Ok(doctor)
    }

    pub async fn delete_doctor(&self, email: &str) -> Result<bool, DoctorError> {
        let path = format!("/rest/v1/doctors?email={}", eq_filter(email));
        let removed: Vec<DoctorRecord> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(prefer_headers("return=representation")),
        ).await?;

        if !removed.is_empty() {
            info!("Removed doctor {}", email);
        }
        Ok(!removed.is_empty())
    }
}
