use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use shared_models::auth::{Identity, JwtClaims, TokenResponse};

/// Mints an HS256 credential for `email`, valid for `ttl_hours`.
pub fn issue_token(email: &str, jwt_secret: &str, ttl_hours: i64) -> Result<TokenResponse, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now();
    let expires_at = now + Duration::hours(ttl_hours);

    let claims = JwtClaims {
        email: email.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign token: {}", e))?;

    debug!("Issued token for {} (expires {})", email, expires_at);
    Ok(TokenResponse { token, expires_at })
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Identity, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => "Token expired".to_string(),
            ErrorKind::InvalidSignature => "Invalid token signature".to_string(),
            _ => "Invalid token format".to_string(),
        }
    })?;

    let identity = Identity::from_claims(data.claims);
    debug!("Token validated successfully for: {}", identity.email);
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::JwtTestUtils;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_issue_and_validate() {
        let issued = issue_token("x@x.com", SECRET, 72).unwrap();
        let identity = validate_token(&issued.token, SECRET).unwrap();

        assert_eq!(identity.email, "x@x.com");
        let ttl = issued.expires_at - Utc::now();
        assert!(ttl > Duration::hours(71) && ttl <= Duration::hours(72));
    }

    #[test]
    fn test_issue_without_secret() {
        assert!(issue_token("x@x.com", "", 72).is_err());
    }

    #[test]
    fn test_validate_accepts_externally_minted_token() {
        let token = JwtTestUtils::create_test_token("a@x.com", SECRET, Some(1));
        assert_eq!(validate_token(&token, SECRET).unwrap().email, "a@x.com");
    }

    #[test]
    fn test_validate_rejects_expired() {
        let token = JwtTestUtils::create_expired_token("a@x.com", SECRET);
        assert_eq!(validate_token(&token, SECRET).unwrap_err(), "Token expired");
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let token = JwtTestUtils::create_invalid_signature_token("a@x.com");
        assert_eq!(validate_token(&token, SECRET).unwrap_err(), "Invalid token signature");
    }

    #[test]
    fn test_validate_rejects_malformed() {
        let token = JwtTestUtils::create_malformed_token();
        assert!(validate_token(&token, SECRET).is_err());
    }
}
