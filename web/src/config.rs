//! Configuration management for the registration server.
//!
//! Loads configuration from environment variables. Store credentials and
//! table names have no defaults: a missing value stops the server at startup.

use registration_airtable::{AirtableConfig, AirtableError};
use registration_core::processor::{DuplicateCodePolicy, ProcessorConfig};
use std::env;
use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Why the configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    /// A variable is set to an unusable value
    #[error("Invalid {name} value {value:?}: {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Rejected value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Airtable settings are incomplete or invalid
    #[error(transparent)]
    Airtable(#[from] AirtableError),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Airtable connection
    pub airtable: AirtableConfig,
    /// Tables and policies of the processor
    pub processor: ProcessorConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter directive, taken from `RUST_LOG` or the default
    pub log_level: String,
    /// Metrics server host (for Prometheus scraping)
    pub metrics_host: String,
    /// Metrics server port
    pub metrics_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info,registration_web=debug".to_string(),
            metrics_host: "0.0.0.0".to_string(),
            metrics_port: 9090,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    /// Log filter built from `log_level`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming `RUST_LOG` for an unparseable
    /// directive.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.log_level).map_err(|e| ConfigError::Invalid {
            name: "RUST_LOG",
            value: self.log_level.clone(),
            reason: e.to_string(),
        })
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `HOST` | `0.0.0.0` |
    /// | `PORT` | `8080` |
    /// | `RUST_LOG` | `info,registration_web=debug` |
    /// | `METRICS_HOST` | `0.0.0.0` |
    /// | `METRICS_PORT` | `9090` |
    /// | `SHUTDOWN_TIMEOUT` | `30` |
    /// | `AIRTABLE_API_KEY` | required |
    /// | `AIRTABLE_BASE_ID` | required |
    /// | `AIRTABLE_ENDPOINT_URL` | `https://api.airtable.com` |
    /// | `AIRTABLE_TIMEOUT_SECS` | `30` |
    /// | `AIRTABLE_TABLE_NAME` | required |
    /// | `AIRTABLE_VALIDATION_TABLE_NAME` | required |
    /// | `REGISTRATION_DUPLICATE_CODES` | `merge` |
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for the first missing or invalid variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT", defaults.port)?,
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            metrics_host: env::var("METRICS_HOST").unwrap_or(defaults.metrics_host),
            metrics_port: parsed("METRICS_PORT", defaults.metrics_port)?,
            shutdown_timeout: parsed("SHUTDOWN_TIMEOUT", defaults.shutdown_timeout)?,
        };

        let airtable = AirtableConfig::from_env()?;

        let processor = ProcessorConfig::new(
            required("AIRTABLE_TABLE_NAME")?,
            required("AIRTABLE_VALIDATION_TABLE_NAME")?,
        )
        .with_duplicate_codes(parsed("REGISTRATION_DUPLICATE_CODES", DuplicateCodePolicy::default())?);

        Ok(Self {
            server,
            airtable,
            processor,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
