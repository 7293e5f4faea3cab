//! Listener settings for the payment API.
//!
//! One listener serves both the checkout endpoints called by the course
//! frontend and the return/IPN endpoints called by the gateway.

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for `request_timeout_secs`. The gateway retries an IPN that
/// is not answered promptly, so long timeouts only delay that retry.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Deployment stage. Production tightens URL checks and switches logs to JSON.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Checkout frontends allowed to call the API, comma-separated.
    /// Gateway callbacks are server-to-server or top-level redirects and
    /// do not need an entry here.
    pub cors_origins: Option<String>,
}

impl ServerConfig {
    /// Address the payment API binds to. Only IP literals are accepted.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidSocketAddress)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Frontend origins with blank entries dropped.
    pub fn allowed_origins(&self) -> Vec<&str> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr()?;

        for origin in self.allowed_origins() {
            if !origin.starts_with("https://") && !origin.starts_with("http://") {
                return Err(ValidationError::InvalidCorsOrigin(origin.to_string()));
            }
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_filter: default_log_filter(),
            request_timeout_secs: default_request_timeout_secs(),
            cors_origins: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_filter() -> String {
    "info,codelab_payments=debug,sqlx=warn".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_bind_all_interfaces_in_development() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.log_filter.contains("codelab_payments=debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hostname_is_not_a_bind_address() {
        let config = ServerConfig {
            host: "payments.codelab.example".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSocketAddress));
    }

    #[test]
    fn test_production_flag() {
        let config = ServerConfig {
            environment: Environment::Production,
            ..Default::default()
        };
        assert!(config.is_production());
        assert!(!ServerConfig::default().is_production());
    }

    #[test]
    fn test_allowed_origins_skip_blank_entries() {
        let config = ServerConfig {
            cors_origins: Some(" https://codelab.example, ,http://localhost:5173,".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.allowed_origins(),
            vec!["https://codelab.example", "http://localhost:5173"]
        );
        assert!(ServerConfig::default().allowed_origins().is_empty());
    }

    #[test]
    fn test_origin_without_scheme_is_rejected() {
        let config = ServerConfig {
            cors_origins: Some("https://codelab.example,codelab.example".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidCorsOrigin("codelab.example".to_string()))
        );
    }

    #[test]
    fn test_port_zero_is_rejected() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn test_request_timeout_bounds() {
        for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
            let config = ServerConfig {
                request_timeout_secs: secs,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        }

        let config = ServerConfig {
            request_timeout_secs: MAX_REQUEST_TIMEOUT_SECS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
