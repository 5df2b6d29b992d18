//! OpenAPI Document for the NowYouSeeMe API
//!
//! Generated by utoipa from the route annotations and schema derives.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{health, visualization};
use crate::telemetry::metrics;
use crate::types::*;

use nowyouseeme_core::{HealthStatus, VersionRecord, Visualization, VisualizationMetadata};

/// OpenAPI document for the NowYouSeeMe API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NowYouSeeMe API",
        version = "0.1.0",
        description = "Storage and retrieval of AI agent self-visualizations",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local Development")
    ),
    tags(
        (name = "Visualizations", description = "Agent self-visualization records"),
        (name = "Health", description = "Status and readiness probes"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        // === Visualization Routes ===
        visualization::list_visualizations,
        visualization::get_visualization,
        visualization::create_visualization,
        visualization::update_visualization,
        visualization::delete_visualization,

        // === Health Routes ===
        health::api_health,
        health::ping,
        health::liveness,
        health::readiness,

        // === Observability ===
        metrics::metrics_handler,
    ),
    components(
        schemas(
            // === Error Types ===
            ApiError, ErrorCode,

            // === Visualization Types ===
            CreateVisualizationRequest, UpdateVisualizationRequest,
            ListVisualizationsResponse, DeleteVisualizationResponse,

            // === Health Types ===
            HealthCheckResponse, HealthResponse, HealthDetails, ComponentHealth,

            // === Core Domain Types ===
            Visualization, VisualizationMetadata, VersionRecord, HealthStatus
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI document as a JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
