//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `APP_BASE_URL` - Public URL of this service (used for webhook callbacks)
//! - `SHOPIFY_STORE` - Shop domain the admin surface operates on
//!   (e.g., your-store.myshopify.com)
//! - `SHOPIFY_API_SECRET` - App client secret (webhook HMAC verification)
//!
//! ## Optional
//! - `APP_HOST` - Bind address (default: 127.0.0.1)
//! - `APP_PORT` - Listen port (default: 3001)
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2024-10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2024-10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of this service
    pub base_url: String,
    /// Shopify gateway configuration
    pub shopify: ShopifyConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify gateway configuration.
///
/// Implements `Debug` manually to redact the app secret.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shop domain the admin routes operate on
    pub store: String,
    /// Admin API version (e.g., 2024-10)
    pub api_version: String,
    /// App client secret, used only for webhook HMAC verification
    pub api_secret: SecretString,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = SecretString::from(required("DATABASE_URL")?);
        let base_url = required("APP_BASE_URL")?
            .trim_end_matches('/')
            .to_string();

        let host = optional("APP_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("APP_HOST".into(), e.to_string()))?;
        let port = optional("APP_PORT")
            .unwrap_or_else(|| "3001".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("APP_PORT".into(), e.to_string()))?;

        let shopify = ShopifyConfig {
            store: required("SHOPIFY_STORE")?,
            api_version: optional("SHOPIFY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            api_secret: SecretString::from(required("SHOPIFY_API_SECRET")?),
        };

        let sentry_sample_rate = parse_rate("SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            shopify,
            sentry_dsn: optional("SENTRY_DSN"),
            sentry_environment: optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_rate(name: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = optional(name) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            name.to_string(),
            format!("{rate} is not between 0.0 and 1.0"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_config_debug_redacts_secret() {
        let config = ShopifyConfig {
            store: "demo.myshopify.com".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_secret: SecretString::from("shh-very-secret"),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("shh-very-secret"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("DATABASE_URL".to_string());
        assert_eq!(err.to_string(), "Missing environment variable: DATABASE_URL");
    }
}
