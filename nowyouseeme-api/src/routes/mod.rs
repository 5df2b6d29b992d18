//! REST API Routes Module
//!
//! Includes:
//! - Visualization CRUD under /api/v1/visualizations
//! - Health check endpoints (/api/v1/health and Kubernetes-style /health/*)
//! - Prometheus metrics at /metrics
//! - CORS support for browser-based clients

pub mod health;
pub mod visualization;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, request, HeaderValue, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use nowyouseeme_storage::SharedStore;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::telemetry::{metrics_handler, observability_middleware, preflight_status_middleware};

pub use health::create_router as health_router;
pub use visualization::create_router as visualization_router;

// ============================================================================
// OPENAPI ENDPOINTS
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;

    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// CORS
// ============================================================================

/// Build the CORS layer from configuration.
///
/// An empty origin list (or a literal `*`) allows every origin; otherwise
/// only listed origins, including `*.domain` wildcards, are echoed back.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.allows_any_origin() {
        tracing::info!("CORS: allowing all origins");
        if config.cors_allow_credentials {
            tracing::warn!("CORS: credentials ignored while every origin is allowed");
        }
        return cors.allow_origin(Any).allow_headers(Any);
    }

    tracing::info!(origins = ?config.cors_origins, "CORS: allowing configured origins");
    let allowed = config.clone();
    let cors = cors
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &request::Parts| {
                origin
                    .to_str()
                    .map(|origin| allowed.is_origin_allowed(origin))
                    .unwrap_or(false)
            },
        ));

    if config.cors_allow_credentials {
        cors.allow_credentials(true)
    } else {
        cors
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// - Visualization CRUD under /api/v1/visualizations
/// - Status check at /api/v1/health
/// - Probes at /health/{ping,live,ready}
/// - Metrics at /metrics
/// - OpenAPI document at /openapi.json (openapi feature)
/// - Swagger UI at /swagger-ui (swagger-ui feature)
///
/// Request bodies are unbounded unless `max_body_bytes` is set.
/// Every response, errors and preflights included, carries CORS headers.
pub fn create_api_router(store: SharedStore, config: &ApiConfig) -> ApiResult<Router> {
    let api_routes = Router::new()
        .nest("/visualizations", visualization::create_router(store.clone()))
        .route("/health", get(health::api_health));

    #[allow(unused_mut)]
    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health::create_router(store))
        .route("/metrics", get(metrics_handler));

    #[cfg(feature = "openapi")]
    {
        router = router.route("/openapi.json", get(openapi_json));
    }

    #[cfg(feature = "swagger-ui")]
    {
        use crate::openapi::ApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    let body_limit = match config.max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Ok(router
        .layer(body_limit)
        .layer(from_fn(observability_middleware))
        .layer(build_cors_layer(config))
        .layer(from_fn(preflight_status_middleware)))
}
