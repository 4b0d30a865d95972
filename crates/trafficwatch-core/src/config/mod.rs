//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and `TRAFFICWATCH__*` environment variables. Each sub-module
//! represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod detection;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::detection::DetectionConfig;
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Every section falls back to its defaults, so an empty source set yields
/// a runnable development configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Real-time connection settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Detection emitter settings.
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// (`config/{env}.toml`) and environment variables prefixed with
    /// `TRAFFICWATCH__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Same as [`AppConfig::load`] with an explicit configuration directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TRAFFICWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let parsed: Self = config.try_deserialize()?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if self.detection.interval_seconds == 0 {
            return Err(AppError::configuration(
                "detection.interval_seconds must be greater than zero",
            ));
        }
        if !(0.0..=1.0).contains(&self.detection.emit_probability) {
            return Err(AppError::configuration(
                "detection.emit_probability must be within [0, 1]",
            ));
        }
        if self.detection.addresses.is_empty() {
            return Err(AppError::configuration(
                "detection.addresses must list at least one location",
            ));
        }
        if self.realtime.channel_buffer_size == 0 {
            return Err(AppError::configuration(
                "realtime.channel_buffer_size must be greater than zero",
            ));
        }
        Ok(())
    }
}
