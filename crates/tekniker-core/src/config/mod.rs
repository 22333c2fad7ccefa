//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! layered sources: `config/default.toml`, an environment overlay,
//! `TEKNIKER__*` environment variables and finally the legacy variable
//! names (`BASE_URL`, `CLIENT_ID`, `SMTP_SERVER`, ...) used by older
//! deployments. Each sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod cache;
pub mod clearpass;
pub mod logging;
pub mod session;
pub mod smtp;

use std::path::Path;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::AuthConfig;
use self::cache::CacheConfig;
use self::clearpass::ClearPassConfig;
use self::logging::LoggingConfig;
use self::session::SessionConfig;
use self::smtp::SmtpConfig;

use crate::error::AppError;

pub use self::app::CorsConfig;

/// Legacy environment variable → configuration key.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("BASE_URL", "clearpass.base_url"),
    ("CLIENT_ID", "clearpass.client_id"),
    ("CLIENT_SECRET", "clearpass.client_secret"),
    ("SMTP_SERVER", "smtp.server"),
    ("SMTP_PORT", "smtp.port"),
    ("SMTP_FROM", "smtp.from"),
    ("SMTP_FROM_NAME", "smtp.from_name"),
    ("REDIS_URL", "cache.redis.url"),
];

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// ClearPass API settings.
    #[serde(default)]
    pub clearpass: ClearPassConfig,
    /// Outgoing mail settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// One-time code, allow-list and rate limit settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name from `./config`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::build(Path::new("config"), env, |key| std::env::var(key).ok())
    }

    /// Build configuration from a config directory and a lookup function
    /// for the legacy environment variables.
    pub fn build<F>(config_dir: &Path, env: &str, legacy: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::from(config_dir.join("default")).required(false))
            .add_source(config::File::from(config_dir.join(env)).required(false))
            .add_source(
                config::Environment::with_prefix("TEKNIKER")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_KEYS {
            let value = legacy(var).filter(|v| !v.trim().is_empty());
            if *var == "REDIS_URL" && value.is_some() {
                // Older deployments always ran on Redis; an explicit provider still wins.
                builder = builder.set_default("cache.provider", "redis")?;
            }
            builder = builder.set_override_option(*key, value)?;
        }

        let config = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Check settings that have no usable default.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.clearpass.base_url.trim().is_empty() {
            return Err(AppError::configuration("clearpass.base_url is not set"));
        }
        if self.clearpass.client_id.trim().is_empty() {
            return Err(AppError::configuration("clearpass.client_id is not set"));
        }
        if self.smtp.server.trim().is_empty() {
            return Err(AppError::configuration("smtp.server is not set"));
        }
        if self.smtp.from.trim().is_empty() {
            return Err(AppError::configuration("smtp.from is not set"));
        }
        Ok(())
    }
}
