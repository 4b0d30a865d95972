//! JWT token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;

use jsonwebtoken::Algorithm;

use trafficwatch_core::error::AppError;

/// Parses the configured algorithm name; only HMAC algorithms work with a shared secret.
pub(crate) fn parse_algorithm(name: &str) -> Result<Algorithm, AppError> {
    let algorithm: Algorithm = name
        .parse()
        .map_err(|_| AppError::configuration(format!("Unknown JWT algorithm '{name}'")))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(AppError::configuration(format!(
            "JWT algorithm {other:?} needs a key pair; only HS256, HS384 and HS512 are supported"
        ))),
    }
}
