//! Credential verification configuration.

use serde::{Deserialize, Serialize};

/// Settings shared by the JWT encoder and decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for HMAC signing.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected signature algorithm (`HS256`, `HS384` or `HS512`).
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,
    /// Lifetime of issued tokens in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
    /// Clock skew tolerated when checking `exp`.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_algorithm: default_jwt_algorithm(),
            token_ttl_seconds: default_token_ttl(),
            leeway_seconds: default_leeway(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_token_ttl() -> u64 {
    86400
}

fn default_leeway() -> u64 {
    5
}
