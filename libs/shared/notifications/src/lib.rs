pub mod dispatcher;
pub mod sendgrid;

pub use dispatcher::{DispatcherHandle, EmailDispatcher};
pub use sendgrid::SendGridClient;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Delivery backend behind the dispatcher.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// Used when no mail provider is configured: logs and drops every message.
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        warn!("Mail provider not configured, dropping email to {}", email.to);
        Ok(())
    }
}
