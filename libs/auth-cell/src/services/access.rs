use std::sync::Arc;

use tracing::debug;

use shared_database::SupabaseClient;
use shared_models::auth::Identity;
use shared_models::error::AppError;

use crate::services::UserService;

/// Role checks against the stored user record.
pub struct AccessControl {
    users: UserService,
}

impl AccessControl {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { users: UserService::new(supabase) }
    }

    /// Passes only when the caller's record exists and carries the admin
    /// role. A missing record is refused like any other non-admin.
    pub async fn authorize_admin(&self, identity: &Identity) -> Result<(), AppError> {
        match self.users.find_user(&identity.email).await? {
            Some(user) if user.is_admin() => Ok(()),
            Some(_) => {
                debug!("{} is not an admin", identity.email);
                Err(AppError::Forbidden("Forbidden Access".to_string()))
            }
            None => {
                debug!("No user record for {}", identity.email);
                Err(AppError::Forbidden("Forbidden Access".to_string()))
            }
        }
    }

    pub async fn is_admin(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.users
            .find_user(email)
            .await?
            .map(|user| user.is_admin())
            .unwrap_or(false))
    }
}
