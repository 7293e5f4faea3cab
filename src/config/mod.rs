//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CODELAB` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use codelab_payments::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod database;
mod error;
mod payment;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment gateway configuration (VNPay)
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CODELAB` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CODELAB__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CODELAB__PAYMENT__SIGNING_KEY=...` -> `payment.signing_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CODELAB")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate(&self.server.environment)?;
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
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("CODELAB__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("CODELAB__PAYMENT__SIGNING_KEY", "secret123");
        env::set_var("CODELAB__PAYMENT__MERCHANT_CODE", "TEST01");
        env::set_var(
            "CODELAB__PAYMENT__RETURN_URL",
            "https://codelab.example/payments/return",
        );
    }

    fn clear_env() {
        env::remove_var("CODELAB__DATABASE__URL");
        env::remove_var("CODELAB__PAYMENT__SIGNING_KEY");
        env::remove_var("CODELAB__PAYMENT__MERCHANT_CODE");
        env::remove_var("CODELAB__PAYMENT__RETURN_URL");
        env::remove_var("CODELAB__PAYMENT__EXPIRE_MINUTES");
        env::remove_var("CODELAB__PAYMENT__EXPIRY_GRACE_MINUTES");
        env::remove_var("CODELAB__SERVER__PORT");
        env::remove_var("CODELAB__SERVER__ENVIRONMENT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.payment.signing_key.expose_secret(), "secret123");
        assert_eq!(config.payment.merchant_code, "TEST01");
        assert_eq!(config.payment.locale, "vn");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_payment_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CODELAB__DATABASE__URL", "postgresql://test@localhost/test");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CODELAB__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_numeric_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CODELAB__SERVER__PORT", "3000");
        env::set_var("CODELAB__PAYMENT__EXPIRE_MINUTES", "30");
        env::set_var("CODELAB__PAYMENT__EXPIRY_GRACE_MINUTES", "5");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.payment.expire_minutes, 30);
        assert_eq!(config.payment.expiry_grace_minutes, 5);
    }
}
