use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{PaymentError, StripeErrorBody, StripePaymentIntent};

/// Stripe PaymentIntents client.
/// POST /v1/payment_intents
pub struct StripeClient {
    client: Client,
    secret_key: String,
    base_url: String,
    currency: String,
}

impl StripeClient {
    pub fn new(config: &AppConfig) -> Result<Self, PaymentError> {
        if !config.is_payment_configured() {
            return Err(PaymentError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            secret_key: config.stripe_secret_key.clone(),
            base_url: config.stripe_base_url.trim_end_matches('/').to_string(),
            currency: config.payment_currency.to_lowercase(),
        })
    }

    /// Creates a card-only intent for `amount` minor units.
    pub async fn create_payment_intent(&self, amount: i64) -> Result<StripePaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.base_url);
        debug!("Creating payment intent for {} {}", amount, self.currency);

        let amount = amount.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", self.currency.as_str()),
            ("payment_method_types[]", "card"),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<StripeErrorBody>(&response_text)
                .ok()
                .and_then(|body| body.error.message.or(body.error.error_type))
                .unwrap_or_else(|| format!("HTTP {}", status));
            error!("Stripe payment intent failed: {} - {}", status, response_text);
            return Err(PaymentError::Processor { message });
        }

        let intent: StripePaymentIntent = serde_json::from_str(&response_text)
            .map_err(|e| PaymentError::Processor {
                message: format!("Failed to parse payment intent: {}", e),
            })?;

        info!("Created payment intent {} ({} {})", intent.id, intent.amount, intent.currency);
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_utils::test_utils::TestConfig;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(mock_server: &MockServer) -> StripeClient {
        let config = TestConfig {
            stripe_base_url: mock_server.uri(),
            ..TestConfig::default()
        }
        .to_app_config();
        StripeClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_create_payment_intent_sends_form() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("authorization", "Bearer sk_test_123"))
            .and(body_string_contains("amount=5000"))
            .and(body_string_contains("currency=usd"))
            .and(body_string_contains("card"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pi_123",
                "object": "payment_intent",
                "client_secret": "pi_123_secret_abc",
                "amount": 5000,
                "currency": "usd",
                "status": "requires_payment_method"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let intent = client_for(&mock_server).create_payment_intent(5000).await.unwrap();

        assert_eq!(intent.client_secret, "pi_123_secret_abc");
        assert_eq!(intent.amount, 5000);
    }

    #[tokio::test]
    async fn test_processor_error_message_is_surfaced() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": "Amount must be at least $0.50 usd"
                }
            })))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).create_payment_intent(10).await;

        assert_matches!(result, Err(PaymentError::Processor { message }) if message.contains("at least"));
    }

    #[test]
    fn test_unconfigured_client() {
        let mut config = TestConfig::default().to_app_config();
        config.stripe_secret_key.clear();

        assert_matches!(StripeClient::new(&config).err(), Some(PaymentError::NotConfigured));
    }
}
