//! API server configuration.
//!
//! Layered with the `config` crate:
//!
//! ```text
//! built-in defaults
//!       │
//!       ▼
//! revenda.toml (or the file named by REVENDA_CONFIG), optional
//!       │
//!       ▼
//! REVENDA_* environment variables   e.g. REVENDA_HTTP_PORT=8080
//! ```

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Config file read when `REVENDA_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "revenda.toml";

/// Development signing secret. Startup warns when it is still in use.
const DEV_JWT_SECRET: &str = "revenda-dev-secret-change-in-production";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind.
    pub http_host: String,

    /// HTTP port.
    pub http_port: u16,

    /// SQLite database file.
    pub database_path: String,

    /// Pool size.
    pub db_max_connections: u32,

    /// Secret key for signing session tokens.
    pub jwt_secret: String,

    /// Argon2 time cost (iterations).
    pub password_hash_cost: u32,

    /// Allowed CORS origin. Any origin when unset.
    pub frontend_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_host: "0.0.0.0".to_string(),
            http_port: 3000,
            database_path: "revenda.db".to_string(),
            db_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            password_hash_cost: 2,
            frontend_url: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from defaults, the optional config file and the
    /// environment, then validates it.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("REVENDA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let defaults = ApiConfig::default();

        let config: ApiConfig = Config::builder()
            .set_default("http_host", defaults.http_host)?
            .set_default("http_port", i64::from(defaults.http_port))?
            .set_default("database_path", defaults.database_path)?
            .set_default("db_max_connections", i64::from(defaults.db_max_connections))?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("password_hash_cost", i64::from(defaults.password_hash_cost))?
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("REVENDA").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;

        if config.jwt_secret == DEV_JWT_SECRET {
            warn!("Using the development JWT secret; set REVENDA_JWT_SECRET in production");
        }

        Ok(config)
    }

    /// Checks values the type system can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt_secret".to_string()));
        }
        if self.password_hash_cost == 0 {
            return Err(ConfigError::InvalidValue("password_hash_cost".to_string()));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("db_max_connections".to_string()));
        }
        Ok(())
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = ApiConfig {
            jwt_secret: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(field)) if field == "jwt_secret"
        ));
    }

    #[test]
    fn test_zero_cost_and_pool_rejected() {
        let config = ApiConfig {
            password_hash_cost: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            db_max_connections: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
