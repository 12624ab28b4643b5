//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `INTAKE_BOT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use intake_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod database;
mod dialogue;
mod error;
mod server;
mod whatsapp;

pub use database::DatabaseConfig;
pub use dialogue::DialogueConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use whatsapp::WhatsAppConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection, optional outside production)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// WhatsApp Cloud API configuration
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Dialogue engine settings
    #[serde(default)]
    pub dialogue: DialogueConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INTAKE_BOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `INTAKE_BOT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `INTAKE_BOT__DATABASE__URL=...` -> `database.url = ...`
    /// - `INTAKE_BOT__WHATSAPP__ACCESS_TOKEN=...` -> `whatsapp.access_token = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("INTAKE_BOT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Production additionally requires a database URL, WhatsApp
    /// credentials, and an HTTPS provider URL.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let production = self.is_production();
        self.server.validate()?;
        self.database.validate(production)?;
        self.whatsapp.validate(production)?;
        self.dialogue.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "INTAKE_BOT__DATABASE__URL",
        "INTAKE_BOT__WHATSAPP__WEBHOOK_VERIFY_TOKEN",
        "INTAKE_BOT__WHATSAPP__PHONE_NUMBER_ID",
        "INTAKE_BOT__WHATSAPP__ACCESS_TOKEN",
        "INTAKE_BOT__SERVER__PORT",
        "INTAKE_BOT__SERVER__ENVIRONMENT",
        "INTAKE_BOT__DIALOGUE__UTC_OFFSET_HOURS",
    ];

    /// Helper to set environment variables for testing
    fn set_minimal_env() {
        env::set_var("INTAKE_BOT__WHATSAPP__WEBHOOK_VERIFY_TOKEN", "verify-me");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        set_minimal_env();
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.whatsapp.webhook_verify_token, "verify-me");
        assert_eq!(config.database.url(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.dialogue.utc_offset_hours, -3);
    }

    #[test]
    fn test_custom_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("INTAKE_BOT__SERVER__PORT", "3000"),
            ("INTAKE_BOT__DATABASE__URL", "postgresql://bot@localhost/intake"),
            ("INTAKE_BOT__DIALOGUE__UTC_OFFSET_HOURS", "-4"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url(), Some("postgresql://bot@localhost/intake"));
        assert_eq!(config.dialogue.utc_offset_hours, -4);
    }

    #[test]
    fn test_production_requires_database_and_credentials() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("INTAKE_BOT__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
        assert!(matches!(config.validate(), Err(ValidationError::MissingRequired(_))));
    }

    #[test]
    fn test_production_config_validates() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("INTAKE_BOT__SERVER__ENVIRONMENT", "production"),
            ("INTAKE_BOT__DATABASE__URL", "postgresql://bot@db/intake"),
            ("INTAKE_BOT__WHATSAPP__PHONE_NUMBER_ID", "1234567890"),
            ("INTAKE_BOT__WHATSAPP__ACCESS_TOKEN", "EAAG-token"),
        ])
        .unwrap();

        assert!(config.validate().is_ok());
    }
}
