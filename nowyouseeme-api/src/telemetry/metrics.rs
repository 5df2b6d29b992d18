//! Prometheus Metrics Definitions
//!
//! Defines the service metrics and exposes them on `/metrics` for scraping.

use axum::{http::StatusCode, response::IntoResponse};
use nowyouseeme_core::{StoreError, StoreResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_gauge, CounterVec, Encoder,
    HistogramVec, IntGauge, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance - initialized on first use
pub static METRICS: Lazy<ApiResult<NowYouSeeMeMetrics>> = Lazy::new(NowYouSeeMeMetrics::new);

/// Container for all service metrics.
#[derive(Clone)]
pub struct NowYouSeeMeMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Store operation counter - labels: operation, status
    pub store_operations_total: CounterVec,

    /// Number of records currently held by the store
    pub visualizations_stored: IntGauge,
}

impl NowYouSeeMeMetrics {
    /// Create and register all metrics with the default Prometheus registry.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "nowyouseeme_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| registration_error("http_requests_total", e))?,

            http_request_duration_seconds: register_histogram_vec!(
                "nowyouseeme_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("http_request_duration_seconds", e))?,

            store_operations_total: register_counter_vec!(
                "nowyouseeme_store_operations_total",
                "Total number of store operations",
                &["operation", "status"]
            )
            .map_err(|e| registration_error("store_operations_total", e))?,

            visualizations_stored: register_int_gauge!(
                "nowyouseeme_visualizations_stored",
                "Current number of stored visualizations"
            )
            .map_err(|e| registration_error("visualizations_stored", e))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status_str.as_str()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record the outcome of a store operation.
    pub fn record_store_operation<T>(&self, operation: &str, result: &StoreResult<T>) {
        let status = match result {
            Ok(_) => "success",
            Err(StoreError::NotFound { .. }) => "not_found",
            Err(_) => "error",
        };
        self.store_operations_total
            .with_label_values(&[operation, status])
            .inc();
    }

    pub fn set_visualizations_stored(&self, count: usize) {
        self.visualizations_stored
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

fn registration_error(name: &str, err: prometheus::Error) -> ApiError {
    ApiError::internal_error(format!("Failed to register {}: {}", name, err))
}

/// Run `f` against the global metrics when they initialized successfully.
pub fn with_metrics(f: impl FnOnce(&NowYouSeeMeMetrics)) {
    match METRICS.as_ref() {
        Ok(metrics) => f(metrics),
        Err(e) => tracing::debug!(error = %e, "Metrics unavailable"),
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
))]
pub async fn metrics_handler() -> impl IntoResponse {
    // Force registration so a fresh process still exposes the families.
    with_metrics(|_| {});

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
