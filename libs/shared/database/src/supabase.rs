use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Store client misconfigured: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// PostgREST client for the clinic's tables.
///
/// Built once at startup and shared through `AppState`; the inner
/// `reqwest::Client` keeps the connection pool, so handlers must not
/// construct their own.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Result<Self, DbError> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&config.supabase_service_key)
            .map_err(|_| DbError::Config("service key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.supabase_service_key))
            .map_err(|_| DbError::Config("service key is not a valid header value".to_string()))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, DbError>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         body: Option<Value>,
                                         extra_headers: Option<HeaderMap>)
                                         -> Result<T, DbError>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url);

        if let Some(headers) = extra_headers {
            req = req.headers(headers);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => DbError::Auth(error_text),
                404 => DbError::NotFound(error_text),
                409 => DbError::Conflict(error_text),
                code => DbError::Api { status: code, message: error_text },
            });
        }

        let bytes = response.bytes().await?;
        let data = serde_json::from_slice::<T>(&bytes)?;
        Ok(data)
    }

    /// GET helper for row listings.
    pub async fn select<T>(&self, path: &str) -> Result<Vec<T>, DbError>
    where T: DeserializeOwned {
        self.request(Method::GET, path, None).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// Builds a PostgREST `eq.` filter with the value percent-encoded.
pub fn eq_filter(value: &str) -> String {
    format!("eq.{}", urlencoding::encode(value))
}

/// `Prefer` header for writes; always asks for the affected rows back.
pub fn prefer_headers(prefer: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static(prefer));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use wiremock::{MockServer, Mock, ResponseTemplate};
    use wiremock::matchers::{method, path, header};

    fn config_for(url: &str) -> AppConfig {
        AppConfig {
            port: 0,
            supabase_url: url.to_string(),
            supabase_service_key: "service-key".to_string(),
            jwt_secret: "secret".to_string(),
            token_ttl_hours: 72,
            request_timeout_secs: 5,
            sendgrid_api_key: String::new(),
            sendgrid_base_url: String::new(),
            email_sender: String::new(),
            stripe_secret_key: String::new(),
            stripe_base_url: String::new(),
            payment_currency: "usd".to_string(),
            admin_emails: vec![],
        }
    }

    #[test]
    fn test_eq_filter_encodes_value() {
        assert_eq!(eq_filter("a+b@x.com"), "eq.a%2Bb%40x.com");
        assert_eq!(eq_filter("2024-01-01"), "eq.2024-01-01");
    }

    #[tokio::test]
    async fn test_request_sends_service_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/services"))
            .and(header("apikey", "service-key"))
            .and(header("Authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config_for(&mock_server.uri())).unwrap();
        let rows: Vec<Value> = client.select("/rest/v1/services").await.unwrap();

        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_conflict() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/bookings"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint"
            })))
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config_for(&mock_server.uri())).unwrap();
        let result: Result<Vec<Value>, DbError> = client
            .request(Method::POST, "/rest/v1/bookings", Some(json!({})))
            .await;

        assert_matches!(result, Err(DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/bookings"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config_for(&mock_server.uri())).unwrap();
        let result: Result<Vec<Value>, DbError> = client.select("/rest/v1/bookings").await;

        assert_matches!(result, Err(DbError::Api { status: 500, .. }));
    }
}
