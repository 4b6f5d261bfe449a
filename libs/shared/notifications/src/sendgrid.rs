use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::{MailTransport, OutgoingEmail};

/// SendGrid v3 mail client.
/// POST /v3/mail/send
pub struct SendGridClient {
    client: Client,
    api_key: String,
    base_url: String,
    sender: String,
}

impl SendGridClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        if !config.is_mail_configured() {
            return Err(anyhow!("SendGrid is not configured"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.sendgrid_api_key.clone(),
            base_url: config.sendgrid_base_url.trim_end_matches('/').to_string(),
            sender: config.email_sender.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for SendGridClient {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let url = format!("{}/v3/mail/send", self.base_url);
        debug!("Sending email to {} via {}", email.to, url);

        let body = json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": { "email": self.sender },
            "subject": email.subject,
            "content": [
                { "type": "text/plain", "value": email.text },
                { "type": "text/html", "value": email.html }
            ]
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("SendGrid rejected email: {} - {}", status, error_text);
            return Err(anyhow!("SendGrid error ({}): {}", status, error_text));
        }

        info!("Message sent to {}", email.to);
        Ok(())
    }
}
