use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use shared_database::{eq_filter, prefer_headers, SupabaseClient};
use shared_models::auth::Role;

use crate::models::{validate_email, User, UserError, UserProfile, UserRecord};

pub struct UserService {
    supabase: Arc<SupabaseClient>,
}

impl UserService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Creates the user on first sight, otherwise merges the supplied
    /// profile fields into the existing record. Fields left out of the
    /// profile keep their stored value, and the role is never touched.
    pub async fn upsert_user(&self, email: &str, profile: UserProfile) -> Result<User, UserError> {
        validate_email(email)?;
        debug!("Upserting user {}", email);

        let mut user_data = Map::new();
        user_data.insert("email".to_string(), json!(email));
        if let Some(name) = profile.name {
            user_data.insert("name".to_string(), json!(name));
        }
        if let Some(phone) = profile.phone {
            user_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(photo_url) = profile.photo_url {
            user_data.insert("photo_url".to_string(), json!(photo_url));
        }
        user_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let rows: Vec<UserRecord> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/users?on_conflict=email",
            Some(Value::Object(user_data)),
            Some(prefer_headers("resolution=merge-duplicates,return=representation")),
        ).await?;

        rows.into_iter()
            .next()
            .map(User::from)
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }

    pub async fn find_user(&self, email: &str) -> Result<Option<User>, UserError> {
        let path = format!("/rest/v1/users?email={}&limit=1", eq_filter(email));
        let rows: Vec<UserRecord> = self.supabase.select(&path).await?;

        Ok(rows.into_iter().next().map(User::from))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        let rows: Vec<UserRecord> = self.supabase
            .select("/rest/v1/users?order=created_at.asc")
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Returns whether a record was removed.
    pub async fn delete_user(&self, email: &str) -> Result<bool, UserError> {
        let path = format!("/rest/v1/users?email={}", eq_filter(email));
        let removed: Vec<UserRecord> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(prefer_headers("return=representation")),
        ).await?;

        if removed.is_empty() {
            debug!("No user {} to delete", email);
            return Ok(false);
        }

        info!("Deleted user {}", email);
        Ok(true)
    }

    pub async fn grant_admin(&self, email: &str) -> Result<User, UserError> {
        let path = format!("/rest/v1/users?email={}", eq_filter(email));
        let update_data = json!({
            "role": Role::Admin,
            "updated_at": Utc::now().to_rfc3339()
        });

        let rows: Vec<UserRecord> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(update_data),
            Some(prefer_headers("return=representation")),
        ).await?;

        let user = rows.into_iter()
            .next()
            .map(User::from)
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        info!("Granted admin role to {}", user.email);
        Ok(user)
    }

    /// Ensures each configured address exists with the admin role. Invalid
    /// addresses are skipped with a warning. Returns how many were seeded.
    pub async fn seed_admins(&self, emails: &[String]) -> Result<usize, UserError> {
        let mut seeded = 0;

        for email in emails {
            if validate_email(email).is_err() {
                warn!("Skipping invalid admin email {:?}", email);
                continue;
            }

            let admin_data = json!({
                "email": email,
                "role": Role::Admin,
                "updated_at": Utc::now().to_rfc3339()
            });

            let _: Vec<UserRecord> = self.supabase.request_with_headers(
                Method::POST,
                "/rest/v1/users?on_conflict=email",
                Some(admin_data),
                Some(prefer_headers("resolution=merge-duplicates,return=representation")),
            ).await?;

            seeded += 1;
        }

        if seeded > 0 {
            info!("Seeded {} admin account(s)", seeded);
        }
        Ok(seeded)
    }
}
