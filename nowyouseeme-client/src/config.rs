//! Client configuration.
//!
//! Read from the environment; the CLI lets flags override both values.

use crate::error::ClientError;

/// Base URL used when `NOWYOUSEEME_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Request timeout used when `NOWYOUSEEME_TIMEOUT_MS` is unset.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including the version prefix, e.g. `http://host:8080/api/v1`.
    pub api_base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Load from `NOWYOUSEEME_API_URL` and `NOWYOUSEEME_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let defaults = Self::default();

        let api_base_url = lookup("NOWYOUSEEME_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        let request_timeout_ms = match lookup("NOWYOUSEEME_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("NOWYOUSEEME_TIMEOUT_MS is not a number: {}", raw))
            })?,
            None => defaults.request_timeout_ms,
        };

        let config = Self {
            api_base_url,
            request_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ClientError::Config(format!(
                "API URL must start with http:// or https://, got {}",
                self.api_base_url
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ClientError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
