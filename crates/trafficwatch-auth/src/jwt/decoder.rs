//! JWT token validation.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{DecodingKey, Validation, decode};

use trafficwatch_core::config::AuthConfig;
use trafficwatch_core::error::AppError;

use super::claims::Claims;
use super::parse_algorithm;

/// Verifies token signatures and expiry against the shared secret.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let algorithm = parse_algorithm(&config.jwt_algorithm)?;

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Decodes and validates a token string.
    ///
    /// Every failure (malformed token, bad signature, wrong algorithm,
    /// expiry, unexpected claim shape) maps to `CredentialInvalid`.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => {
                        AppError::credential_invalid("Token has expired")
                    }
                    JwtErrorKind::InvalidToken => {
                        AppError::credential_invalid("Invalid token format")
                    }
                    JwtErrorKind::InvalidSignature => {
                        AppError::credential_invalid("Invalid token signature")
                    }
                    JwtErrorKind::InvalidAlgorithm => {
                        AppError::credential_invalid("Unexpected token algorithm")
                    }
                    _ => AppError::credential_invalid(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}
