//! Tracing Subscriber Initialization
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and either JSON
//! or human-readable output.

use std::str::FromStr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ApiError, ApiResult};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "nowyouseeme_api=debug,tower_http=debug,info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Multi-line, human-readable
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(ApiError::invalid_input(format!(
                "Unknown log format '{}', expected json or pretty",
                other
            ))),
        }
    }
}

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,
    /// Service version
    pub service_version: String,
    pub log_format: LogFormat,
    /// Filter directives applied when `RUST_LOG` is absent
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: std::env::var("NOWYOUSEEME_SERVICE_NAME")
                .unwrap_or_else(|_| "nowyouseeme-api".to_string()),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_format: std::env::var("NOWYOUSEEME_LOG_FORMAT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once at startup, before any request is served. A second call fails
/// with an `InternalError`.
pub fn init_tracing(config: &TelemetryConfig) -> ApiResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };
    result.map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;

    tracing::info!(
        service_name = %config.service_name,
        service_version = %config.service_version,
        log_format = ?config.log_format,
        "Telemetry initialized"
    );

    Ok(())
}
