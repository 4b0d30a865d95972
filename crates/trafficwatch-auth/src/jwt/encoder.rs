//! JWT token creation with configurable signing and TTL.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use trafficwatch_core::config::AuthConfig;
use trafficwatch_core::error::AppError;
use trafficwatch_entity::user::UserRole;

use super::claims::Claims;
use super::parse_algorithm;

/// Creates signed access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Header carrying the configured algorithm.
    header: Header,
    /// Token TTL in seconds.
    ttl_seconds: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("alg", &self.header.alg)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let algorithm = parse_algorithm(&config.jwt_algorithm)?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(algorithm),
            ttl_seconds: config.token_ttl_seconds as i64,
        })
    }

    /// Issues a token with the configured TTL.
    pub fn issue(
        &self,
        subject_id: &str,
        email: &str,
        role: Option<UserRole>,
    ) -> Result<String, AppError> {
        self.issue_with_ttl(subject_id, email, role, self.ttl_seconds)
    }

    /// Issues a token expiring `ttl_seconds` from now (negative values mint an expired token).
    pub fn issue_with_ttl(
        &self,
        subject_id: &str,
        email: &str,
        role: Option<UserRole>,
        ttl_seconds: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: subject_id.to_string(),
            email: email.to_string(),
            role,
            iat: now,
            exp: now + ttl_seconds,
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }
}
