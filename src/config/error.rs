//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address")]
    InvalidSocketAddress,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("CORS origin must be an http(s) URL: {0}")]
    InvalidCorsOrigin(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid URL for {0}")]
    InvalidPaymentUrl(&'static str),

    #[error("Payment URLs must use HTTPS in production")]
    PaymentUrlMustBeHttps,

    #[error("Unsupported gateway locale (expected 'vn' or 'en')")]
    InvalidLocale,

    #[error("Payment expiry window must be between 1 and 1440 minutes")]
    InvalidExpireWindow,

    #[error("Expiry grace period must be between 0 and 1440 minutes")]
    InvalidExpiryGrace,
}
