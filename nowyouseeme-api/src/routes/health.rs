//! Health Check Endpoints
//!
//! - /api/v1/health - Status and server time
//! - /health/ping - Simple liveness check
//! - /health/live - Process alive check
//! - /health/ready - Store accessibility check

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use nowyouseeme_core::HealthStatus;
use nowyouseeme_storage::SharedStore;
use std::{sync::Arc, time::Instant};

use crate::types::{ComponentHealth, HealthCheckResponse, HealthDetails, HealthResponse};

// ============================================================================
// STATE
// ============================================================================

#[derive(Clone)]
pub struct HealthState {
    pub store: SharedStore,
    pub start_time: Instant,
}

impl HealthState {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /api/v1/health - Service status with the current server time
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheckResponse),
    ),
))]
pub async fn api_health() -> impl IntoResponse {
    Json(HealthCheckResponse {
        status: HealthStatus::Healthy,
        time: Utc::now(),
    })
}

/// GET /health/ping - Simple pong response
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = String),
    ),
))]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health/live - Process liveness check
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
))]
pub async fn liveness() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        message: Some("Process is alive".to_string()),
        details: None,
    };
    (StatusCode::OK, Json(response))
}

/// GET /health/ready - Readiness check (store accessibility)
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Service is not ready", body = HealthResponse),
    ),
))]
pub async fn readiness(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let (store_health, visualization_count) = match state.store.len() {
        Ok(count) => (
            ComponentHealth {
                status: HealthStatus::Healthy,
                error: None,
            },
            Some(count),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Store readiness check failed");
            (
                ComponentHealth {
                    status: HealthStatus::Unhealthy,
                    error: Some(format!("Store check failed: {}", e)),
                },
                None,
            )
        }
    };

    let overall_status = store_health.status;
    let response = HealthResponse {
        status: overall_status,
        message: None,
        details: Some(HealthDetails {
            store: store_health,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            visualization_count,
        }),
    };

    let status_code = if overall_status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the probe router, mounted at `/health`.
pub fn create_router(store: SharedStore) -> Router {
    let state = Arc::new(HealthState::new(store));

    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .with_state(state)
}
