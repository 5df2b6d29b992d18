//! NowYouSeeMe Telemetry - Observability Infrastructure
//!
//! Structured logging through `tracing` and Prometheus metrics for the API
//! layer. Everything works standalone without external collectors.

pub mod metrics;
pub mod middleware;
pub mod tracer;

pub use metrics::{metrics_handler, NowYouSeeMeMetrics, METRICS};
pub use middleware::{observability_middleware, preflight_status_middleware};
pub use tracer::{init_tracing, LogFormat, TelemetryConfig};
