use std::env;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub request_timeout_secs: u64,
    pub sendgrid_api_key: String,
    pub sendgrid_base_url: String,
    pub email_sender: String,
    pub stripe_secret_key: String,
    pub stripe_base_url: String,
    pub payment_currency: String,
    /// Accounts promoted to Admin at startup. The first Admin cannot be
    /// granted through the API, so it has to come from here.
    pub admin_emails: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            port: parse_or("PORT", DEFAULT_PORT),
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .or_else(|_| env::var("ACCESS_TOKEN"))
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            token_ttl_hours: parse_or("TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            sendgrid_api_key: env::var("SENDGRID_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("SENDGRID_API_KEY not set, confirmation emails are disabled");
                    String::new()
                }),
            sendgrid_base_url: env::var("SENDGRID_BASE_URL")
                .unwrap_or_else(|_| "https://api.sendgrid.com".to_string()),
            email_sender: env::var("EMAIL_SENDER")
                .unwrap_or_else(|_| {
                    warn!("EMAIL_SENDER not set, using empty value");
                    String::new()
                }),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY")
                .unwrap_or_else(|_| {
                    warn!("STRIPE_SECRET_KEY not set, payment intents are disabled");
                    String::new()
                }),
            stripe_base_url: env::var("STRIPE_BASE_URL")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            payment_currency: env::var("PAYMENT_CURRENCY")
                .unwrap_or_else(|_| "usd".to_string()),
            admin_emails: parse_email_list(&env::var("ADMIN_EMAILS").unwrap_or_default()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.sendgrid_api_key.is_empty() && !self.email_sender.is_empty()
    }

    pub fn is_payment_configured(&self) -> bool {
        !self.stripe_secret_key.is_empty() && !self.stripe_base_url.is_empty()
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// Splits a comma separated list, dropping blank entries.
pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
        .collect()
}
