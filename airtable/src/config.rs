//! Airtable connection settings.

use crate::error::AirtableError;
use std::time::Duration;

/// Public Airtable API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.airtable.com";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one Airtable base.
#[derive(Clone)]
pub struct AirtableConfig {
    /// Personal access token or API key
    pub api_key: String,
    /// Base identifier (`app...`)
    pub base_id: String,
    /// API endpoint, without the `/v0` suffix
    pub api_url: String,
    /// Transport timeout applied to every request
    pub timeout: Duration,
}

impl AirtableConfig {
    /// Settings for the public endpoint with the default timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_id: base_id.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at another endpoint (a proxy or a test server).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load settings from environment variables.
    ///
    /// - `AIRTABLE_API_KEY` (required)
    /// - `AIRTABLE_BASE_ID` (required)
    /// - `AIRTABLE_ENDPOINT_URL` (default: `https://api.airtable.com`)
    /// - `AIRTABLE_TIMEOUT_SECS` (default: 30)
    ///
    /// # Errors
    ///
    /// Returns `AirtableError::MissingEnv` when a required variable is unset
    /// or blank, and `AirtableError::InvalidEnv` when the timeout is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, AirtableError> {
        let api_key = required("AIRTABLE_API_KEY")?;
        let base_id = required("AIRTABLE_BASE_ID")?;

        let mut config = Self::new(api_key, base_id);

        if let Ok(api_url) = std::env::var("AIRTABLE_ENDPOINT_URL") {
            if !api_url.trim().is_empty() {
                config.api_url = api_url.trim().to_string();
            }
        }

        if let Ok(raw) = std::env::var("AIRTABLE_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(AirtableError::InvalidEnv {
                    name: "AIRTABLE_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn required(name: &'static str) -> Result<String, AirtableError> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(AirtableError::MissingEnv(name))
}

impl std::fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_key", &"<redacted>")
            .field("base_id", &self.base_id)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AirtableConfig::new("key", "appBase");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = AirtableConfig::new("patSECRET", "appBase");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("patSECRET"));
        assert!(rendered.contains("appBase"));
    }
}
