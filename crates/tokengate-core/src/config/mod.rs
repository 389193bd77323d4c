//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::AuthConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `TOKENGATE__`. The plain
    /// `SECRET_KEY`, `DATABASE_URL` and `PORT` variables win over everything
    /// else.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let port = std::env::var("PORT")
            .ok()
            .map(|p| {
                p.parse::<u16>()
                    .map_err(|e| AppError::configuration(format!("Invalid PORT '{p}': {e}")))
            })
            .transpose()?;

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TOKENGATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("auth.jwt_secret", std::env::var("SECRET_KEY").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("server.port", port.map(i64::from))?
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Reject configurations the server must not start with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "auth.jwt_secret (SECRET_KEY) must be set",
            ));
        }
        if self.database.url.trim().is_empty() {
            return Err(AppError::configuration(
                "database.url (DATABASE_URL) must be set",
            ));
        }
        if self.auth.access_ttl_hours <= 0 || self.auth.refresh_ttl_hours <= 0 {
            return Err(AppError::configuration(
                "auth token TTLs must be positive",
            ));
        }
        if self.auth.password_hash_cost == 0 {
            return Err(AppError::configuration(
                "auth.password_hash_cost must be at least 1",
            ));
        }
        if self.database.operation_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "database.operation_timeout_seconds must be at least 1",
            ));
        }
        Ok(())
    }
}
