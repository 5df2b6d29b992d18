//! Visualization REST API Routes
//!
//! Axum route handlers for visualization CRUD. Handlers validate and shape
//! requests; the store only ever sees complete records.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use nowyouseeme_core::{StoreResult, Visualization};
use nowyouseeme_storage::SharedStore;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    extractors::JsonBody,
    telemetry::metrics::with_metrics,
    types::{
        CreateVisualizationRequest, DeleteVisualizationResponse, ListVisualizationsResponse,
        UpdateVisualizationRequest,
    },
    validation::Validate,
};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for visualization routes.
#[derive(Clone)]
pub struct VisualizationState {
    pub store: SharedStore,
}

impl VisualizationState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Count a store call in the metrics and convert its error.
    fn observe<T>(&self, operation: &'static str, result: StoreResult<T>) -> ApiResult<T> {
        with_metrics(|metrics| metrics.record_store_operation(operation, &result));
        result.map_err(|err| {
            tracing::warn!(operation, error = %err, "Store operation failed");
            ApiError::from(err)
        })
    }

    fn refresh_stored_gauge(&self) {
        if let Ok(count) = self.store.len() {
            with_metrics(|metrics| metrics.set_visualizations_stored(count));
        }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/visualizations - List all visualizations
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/visualizations",
    tag = "Visualizations",
    responses(
        (status = 200, description = "Every stored visualization, newest first", body = ListVisualizationsResponse),
        (status = 500, description = "Store unavailable", body = ApiError),
    ),
))]
pub async fn list_visualizations(
    State(state): State<Arc<VisualizationState>>,
) -> ApiResult<impl IntoResponse> {
    let records = state.observe("list", state.store.list())?;
    Ok(Json(ListVisualizationsResponse::from_records(records)))
}

/// GET /api/v1/visualizations/{id} - Get visualization by ID
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/visualizations/{id}",
    tag = "Visualizations",
    params(
        ("id" = String, Path, description = "Visualization ID")
    ),
    responses(
        (status = 200, description = "Visualization details", body = Visualization),
        (status = 404, description = "Visualization not found", body = ApiError),
    ),
))]
pub async fn get_visualization(
    State(state): State<Arc<VisualizationState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let visualization = state.observe("get", state.store.get(&id))?;
    Ok(Json(visualization))
}

/// POST /api/v1/visualizations - Create a new visualization
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/visualizations",
    tag = "Visualizations",
    request_body = CreateVisualizationRequest,
    responses(
        (status = 201, description = "Visualization created successfully", body = Visualization),
        (status = 400, description = "Invalid request or missing field", body = ApiError),
        (status = 413, description = "Request body over the configured limit", body = ApiError),
        (status = 500, description = "Store rejected the record", body = ApiError),
    ),
))]
pub async fn create_visualization(
    State(state): State<Arc<VisualizationState>>,
    JsonBody(req): JsonBody<CreateVisualizationRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let visualization = req.into_visualization();
    state.observe("create", state.store.create(visualization.clone()))?;
    state.refresh_stored_gauge();

    tracing::info!(
        id = %visualization.id,
        agent_name = %visualization.agent_name,
        "Visualization created"
    );
    Ok((StatusCode::CREATED, Json(visualization)))
}

/// PUT /api/v1/visualizations/{id} - Partially update a visualization
///
/// The record is looked up before the body is parsed, so an unknown id is
/// a 404 even when the body is malformed.
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/api/v1/visualizations/{id}",
    tag = "Visualizations",
    params(
        ("id" = String, Path, description = "Visualization ID")
    ),
    request_body = UpdateVisualizationRequest,
    responses(
        (status = 200, description = "Visualization updated successfully", body = Visualization),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Visualization not found", body = ApiError),
    ),
))]
pub async fn update_visualization(
    State(state): State<Arc<VisualizationState>>,
    Path(id): Path<String>,
    payload: Result<JsonBody<UpdateVisualizationRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state.observe("get", state.store.get(&id))?;
    let JsonBody(req) = payload?;

    let updated = state.observe(
        "update",
        state
            .store
            .replace_with(&id, Box::new(move |existing: Visualization| req.apply_to(existing))),
    )?;

    tracing::info!(id = %updated.id, updated_at = %updated.updated_at, "Visualization updated");
    Ok(Json(updated))
}

/// DELETE /api/v1/visualizations/{id} - Delete visualization
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/api/v1/visualizations/{id}",
    tag = "Visualizations",
    params(
        ("id" = String, Path, description = "Visualization ID")
    ),
    responses(
        (status = 200, description = "Visualization deleted successfully", body = DeleteVisualizationResponse),
        (status = 404, description = "Visualization not found", body = ApiError),
    ),
))]
pub async fn delete_visualization(
    State(state): State<Arc<VisualizationState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.observe("delete", state.store.delete(&id))?;
    state.refresh_stored_gauge();

    tracing::info!(id = %id, "Visualization deleted");
    Ok(Json(DeleteVisualizationResponse::deleted(id)))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the visualization router, mounted at `/api/v1/visualizations`.
pub fn create_router(store: SharedStore) -> Router {
    let state = Arc::new(VisualizationState::new(store));

    Router::new()
        .route("/", get(list_visualizations).post(create_visualization))
        .route(
            "/:id",
            get(get_visualization)
                .put(update_visualization)
                .delete(delete_visualization),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use nowyouseeme_storage::MemoryStore;
    use tower::ServiceExt;

    use crate::error::ErrorCode;

    fn test_store() -> SharedStore {
        Arc::new(MemoryStore::new())
    }

    async fn call(
        store: &SharedStore,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> Result<(StatusCode, serde_json::Value), String> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .map_err(|e| e.to_string())?;
        let response = create_router(Arc::clone(store))
            .oneshot(request)
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| format!("Failed to read body: {:?}", e))?;
        let json = serde_json::from_slice(&bytes).map_err(|e| e.to_string())?;
        Ok((status, json))
    }

    #[tokio::test]
    async fn test_create_returns_full_record() -> Result<(), String> {
        let store = test_store();
        let (status, json) = call(
            &store,
            Method::POST,
            "/",
            Some(r#"{"agent_name":"Echo","image_data":"QQ==","tags":["calm"]}"#),
        )
        .await?;

        assert_eq!(status, StatusCode::CREATED);
        let created: Visualization = serde_json::from_value(json).map_err(|e| e.to_string())?;
        assert!(!created.id.is_empty());
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.metadata.tags, vec!["calm"]);
        assert_eq!(store.get(&created.id).map_err(|e| e.to_string())?, created);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_ignores_client_supplied_id() -> Result<(), String> {
        let store = test_store();
        let (status, json) = call(
            &store,
            Method::POST,
            "/",
            Some(r#"{"id":"mine","agent_name":"Echo","image_data":"QQ=="}"#),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
        assert_ne!(json["id"], "mine");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_missing_field_is_bad_request() -> Result<(), String> {
        let store = test_store();
        let (status, json) = call(&store, Method::POST, "/", Some(r#"{"agent_name":"Echo"}"#)).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "MISSING_FIELD");
        assert!(json["error"].as_str().unwrap_or_default().contains("image_data"));
        assert_eq!(store.len(), Ok(0));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() -> Result<(), String> {
        let store = test_store();
        let (status, json) = call(&store, Method::GET, "/nope", None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let err: ApiError = serde_json::from_value(json).map_err(|e| e.to_string())?;
        assert_eq!(err.code, ErrorCode::VisualizationNotFound);
        assert_eq!(err.message, "Visualization not found");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_with_bad_body_is_not_found() -> Result<(), String> {
        let store = test_store();
        let (status, _) = call(&store, Method::PUT, "/nope", Some("{broken")).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_bad_body_leaves_record_untouched() -> Result<(), String> {
        let store = test_store();
        let viz = Visualization::new("Echo", "QQ==");
        store.create(viz.clone()).map_err(|e| e.to_string())?;

        let (status, json) = call(&store, Method::PUT, &format!("/{}", viz.id), Some("{broken")).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(store.get(&viz.id).map_err(|e| e.to_string())?, viz);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_returns_confirmation() -> Result<(), String> {
        let store = test_store();
        let viz = Visualization::new("Echo", "QQ==");
        store.create(viz.clone()).map_err(|e| e.to_string())?;

        let (status, json) = call(&store, Method::DELETE, &format!("/{}", viz.id), None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Visualization deleted successfully");
        assert_eq!(json["id"], viz.id.as_str());

        let (status, _) = call(&store, Method::DELETE, &format!("/{}", viz.id), None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }
}
