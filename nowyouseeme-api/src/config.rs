//! API Configuration Module
//!
//! Configuration for the listen address, CORS and request size limits.
//! Everything is loaded from environment variables with sensible defaults
//! for development.

use std::net::{IpAddr, SocketAddr};

use crate::error::{ApiError, ApiResult};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for CORS and request limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    /// Example: "https://nowyouseeme.dev,*.nowyouseeme.dev"
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    /// Only honoured together with an explicit origin list.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Request Limits
    // ========================================================================
    /// Maximum accepted request body size in bytes.
    /// `None` leaves bodies unbounded; images travel inline as base64.
    pub max_body_bytes: Option<usize>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            cors_allow_credentials: false,
            cors_max_age_secs: 86400, // 24 hours
            max_body_bytes: None,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `NOWYOUSEEME_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `NOWYOUSEEME_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `NOWYOUSEEME_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `NOWYOUSEEME_MAX_BODY_BYTES`: Request body limit (default: unlimited)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let cors_origins = lookup("NOWYOUSEEME_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = lookup("NOWYOUSEEME_CORS_ALLOW_CREDENTIALS")
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(defaults.cors_allow_credentials);

        let cors_max_age_secs = lookup("NOWYOUSEEME_CORS_MAX_AGE_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let max_body_bytes = lookup("NOWYOUSEEME_MAX_BODY_BYTES")
            .and_then(|s| s.parse().ok())
            .filter(|limit: &usize| *limit > 0)
            .or(defaults.max_body_bytes);

        Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            max_body_bytes,
        }
    }

    /// Whether every origin is accepted: no list, or a literal `*` in it.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.allows_any_origin() {
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.nowyouseeme.dev
            if let Some(pattern) = allowed.strip_prefix("*.") {
                let host = origin
                    .strip_prefix("https://")
                    .or_else(|| origin.strip_prefix("http://"));
                if let Some(host) = host {
                    return host
                        .strip_suffix(pattern)
                        .is_some_and(|prefix| prefix.ends_with('.'));
                }
            }
            false
        })
    }
}

// ============================================================================
// LISTEN ADDRESS
// ============================================================================

/// Resolve the listen address from `NOWYOUSEEME_API_BIND` and
/// `PORT` / `NOWYOUSEEME_API_PORT`.
pub fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("NOWYOUSEEME_API_BIND").ok();
    let port = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("NOWYOUSEEME_API_PORT").ok());
    parse_bind_addr(host.as_deref(), port.as_deref())
}

/// Combine an optional host and port into a socket address.
pub fn parse_bind_addr(host: Option<&str>, port: Option<&str>) -> ApiResult<SocketAddr> {
    let host = host.unwrap_or("0.0.0.0");
    let port = match port {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", raw)))?,
        None => DEFAULT_PORT,
    };
    let ip = host
        .parse::<IpAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", host, e)))?;
    Ok(SocketAddr::new(ip, port))
}
