use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};
use shared_notifications::EmailDispatcher;

/// Process-wide dependencies handed to every router.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<SupabaseClient>,
    pub mailer: EmailDispatcher,
}

impl AppState {
    pub fn new(config: AppConfig, mailer: EmailDispatcher) -> Result<Self, DbError> {
        let db = SupabaseClient::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            mailer,
        })
    }
}
