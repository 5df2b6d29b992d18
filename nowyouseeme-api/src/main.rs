use std::sync::Arc;

use axum::Router;
use nowyouseeme_api::{create_api_router, resolve_bind_addr, ApiConfig, ApiError, ApiResult};
use nowyouseeme_api::telemetry::{init_tracing, TelemetryConfig};
use nowyouseeme_storage::{MemoryStore, SharedStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let api_config = ApiConfig::from_env();
    let store: SharedStore = Arc::new(MemoryStore::new());

    let app: Router = create_api_router(store, &api_config)?;

    let addr = resolve_bind_addr()?;
    tracing::info!(
        %addr,
        version = %telemetry_config.service_version,
        "Starting NowYouSeeMe API server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
