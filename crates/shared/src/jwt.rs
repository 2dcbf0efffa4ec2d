//! Admin session tokens (HS256 JWT).
//!
//! The dashboard used to gate itself with a password compared in the
//! browser. The server now issues a short-lived signed token after checking
//! the password hash, and every admin route verifies it.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Subject used for the shared admin account.
pub const ADMIN_SUBJECT: &str = "admin";

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Claims carried by an admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signs and verifies admin session tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub token_expiry_secs: i64,
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("token_expiry_secs", &self.token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Builds a config from a shared secret.
    pub fn from_secret(
        secret: &str,
        token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::InvalidKey(format!(
                "secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_secs,
            leeway_secs,
        })
    }

    /// Issues a token for `subject`. Returns the token and its expiry (unix seconds).
    pub fn issue(&self, subject: &str) -> Result<(String, i64), JwtError> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(self.token_expiry_secs)).timestamp();

        let claims = Claims {
            sub: subject.to_string(),
            exp,
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, exp))
    }

    /// Validates a token and returns its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }

    /// Validates a token and checks that it was issued to the admin account.
    pub fn validate_admin(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate(token)?;
        if claims.sub != ADMIN_SUBJECT {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-for-admin-sessions-0123456789";

    fn config() -> JwtConfig {
        JwtConfig::from_secret(SECRET, 3600, 0).unwrap()
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = JwtConfig::from_secret("too-short", 3600, 0);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_issue_and_validate_admin() {
        let config = config();
        let (token, exp) = config.issue(ADMIN_SUBJECT).unwrap();

        let claims = config.validate_admin(&token).unwrap();
        assert_eq!(claims.sub, ADMIN_SUBJECT);
        assert_eq!(claims.exp, exp);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_non_admin_subject_rejected() {
        let config = config();
        let (token, _) = config.issue("visitor").unwrap();
        assert!(matches!(
            config.validate_admin(&token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = config();
        config.token_expiry_secs = -120;
        let (token, _) = config.issue(ADMIN_SUBJECT).unwrap();

        assert!(matches!(config.validate(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other =
            JwtConfig::from_secret("another-secret-that-is-long-enough-000000", 3600, 0).unwrap();
        let (token, _) = other.issue(ADMIN_SUBJECT).unwrap();

        assert!(matches!(config().validate(&token), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(config().validate("not.a.jwt").is_err());
        assert!(config().validate("").is_err());
    }

    #[test]
    fn test_unique_jti() {
        let config = config();
        let (a, _) = config.issue(ADMIN_SUBJECT).unwrap();
        let (b, _) = config.issue(ADMIN_SUBJECT).unwrap();
        assert_ne!(
            config.validate(&a).unwrap().jti,
            config.validate(&b).unwrap().jti
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(SECRET));
    }
}
