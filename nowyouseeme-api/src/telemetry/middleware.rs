//! Axum Middleware for HTTP Request Tracing and Metrics
//!
//! Provides automatic instrumentation of all HTTP requests with:
//! - A `tracing` span per request
//! - Prometheus metrics labeled by route template
//! - A completion log line

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info_span, Instrument};

use super::metrics::with_metrics;

/// Label used for requests that matched no route.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Route template for metrics/spans, e.g. `/api/v1/visualizations/:id`.
///
/// Raw paths would put every record id into a label value.
fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// Observability middleware for Axum.
///
/// This middleware wraps every request with:
/// 1. A tracing span carrying method and route
/// 2. Prometheus metrics recording
/// 3. Request completion logging
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = route_label(&request);

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
        http.route = %route,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    let status = response.status();

    with_metrics(|metrics| {
        metrics.record_http_request(
            method.as_str(),
            &route,
            status.as_u16(),
            duration.as_secs_f64(),
        )
    });

    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = duration.as_millis() as u64,
        "Request completed"
    );

    response
}

/// Answer every `OPTIONS` request with `204 No Content` and an empty body.
///
/// Runs outside the CORS layer so preflight responses keep their
/// `access-control-*` headers; any other `OPTIONS` request (no preflight
/// headers, unknown path) gets the same treatment.
pub async fn preflight_status_middleware(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    let response = next.run(request).await;
    let (mut parts, _) = response.into_parts();
    parts.status = StatusCode::NO_CONTENT;
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware::from_fn, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/items/:id", get(|| async { "item" }))
            .layer(from_fn(observability_middleware))
            .layer(from_fn(preflight_status_middleware))
    }

    async fn send(method: Method, uri: &str) -> Result<Response, String> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .map_err(|e| e.to_string())?;
        app()
            .oneshot(request)
            .await
            .map_err(|e| format!("Request failed: {:?}", e))
    }

    #[tokio::test]
    async fn test_requests_pass_through() -> Result<(), String> {
        let response = send(Method::GET, "/items/42").await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn test_metrics_use_route_template() -> Result<(), String> {
        send(Method::GET, "/items/550e8400-e29b-41d4-a716-446655440000").await?;

        let mut seen = None;
        with_metrics(|metrics| {
            seen = Some(
                metrics
                    .http_requests_total
                    .with_label_values(&["GET", "/items/:id", "200"])
                    .get(),
            )
        });
        assert!(seen.unwrap_or_default() >= 1.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_options_without_route_is_no_content() -> Result<(), String> {
        let response = send(Method::OPTIONS, "/items/42").await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| format!("Failed to read body: {:?}", e))?;
        assert!(body.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_options_on_unknown_path_is_no_content() -> Result<(), String> {
        let response = send(Method::OPTIONS, "/nowhere").await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        Ok(())
    }
}
