use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::Result;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tokio::sync::Mutex;

use shared_config::AppConfig;
use shared_notifications::{EmailDispatcher, MailTransport, OutgoingEmail};

use crate::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub sendgrid_base_url: String,
    pub stripe_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            sendgrid_base_url: "http://localhost:54322".to_string(),
            stripe_base_url: "http://localhost:54323".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            port: 0,
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_hours: 72,
            request_timeout_secs: 5,
            sendgrid_api_key: "test-sendgrid-key".to_string(),
            sendgrid_base_url: self.sendgrid_base_url.clone(),
            email_sender: "clinic@example.com".to_string(),
            stripe_secret_key: "sk_test_123".to_string(),
            stripe_base_url: self.stripe_base_url.clone(),
            payment_currency: "usd".to_string(),
            admin_emails: vec![],
        }
    }

    /// App state whose outgoing mail is collected and discarded.
    pub fn to_app_state(&self) -> Arc<AppState> {
        self.to_app_state_with_transport(Arc::new(RecordingTransport::default()))
    }

    pub fn to_app_state_with_transport(&self, transport: Arc<dyn MailTransport>) -> Arc<AppState> {
        let (mailer, _handle) = EmailDispatcher::spawn(transport, 16);
        let state = AppState::new(self.to_app_config(), mailer)
            .expect("test config builds a store client");
        Arc::new(state)
    }
}

/// Mail transport that remembers everything it was asked to send.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingTransport {
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }

    /// Polls until `count` emails arrived or `timeout` elapsed.
    pub async fn wait_for(&self, count: usize, timeout: StdDuration) -> Vec<OutgoingEmail> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let sent = self.sent().await;
            if sent.len() >= count || tokio::time::Instant::now() >= deadline {
                return sent;
            }
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(email: &str, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "email": email,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(email: &str, secret: &str) -> String {
        Self::create_test_token(email, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(email: &str) -> String {
        Self::create_test_token(email, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    pub fn bearer(email: &str) -> String {
        format!("Bearer {}", Self::create_test_token(email, TEST_JWT_SECRET, Some(24)))
    }
}

/// Canned PostgREST rows.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn service_response(id: i64, name: &str, slots: &[&str]) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "slots": slots,
            "price": 50.0
        })
    }

    pub fn booking_response(id: &str, patient_email: &str, treatment: &str, date: &str, slot: &str) -> serde_json::Value {
        json!({
            "id": id,
            "patient": "Test Patient",
            "patient_email": patient_email,
            "date": date,
            "slot": slot,
            "treatment": treatment,
            "price": 50.0,
            "paid": false,
            "transaction_id": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn user_response(email: &str, role: &str) -> serde_json::Value {
        json!({
            "email": email,
            "role": role,
            "name": "Test User",
            "phone": null,
            "photo_url": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn doctor_response(id: i64, email: &str, name: &str, specialty: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "email": email,
            "specialty": specialty,
            "img": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
