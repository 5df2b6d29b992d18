//! NowYouSeeMe API - REST Layer
//!
//! Axum server that stores and serves AI agent self-visualizations: an
//! image (base64) plus descriptive metadata per record. Records live in a
//! [`nowyouseeme_storage::VisualizationStore`]; this crate validates
//! requests, shapes responses and carries the ambient concerns (CORS,
//! tracing, metrics, OpenAPI).

pub mod config;
pub mod error;
pub mod extractors;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod telemetry;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::{parse_bind_addr, resolve_bind_addr, ApiConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use types::*;
