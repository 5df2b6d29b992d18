//! Client against a live server bound to an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;

use nowyouseeme_api::types::{CreateVisualizationRequest, UpdateVisualizationRequest};
use nowyouseeme_api::{create_api_router, ApiConfig};
use nowyouseeme_client::{ClientConfig, ClientError, RestClient};
use nowyouseeme_core::HealthStatus;
use nowyouseeme_storage::{MemoryStore, SharedStore};
use nowyouseeme_test_utils::fixtures::{tiny_png_base64, TINY_PNG};

async fn spawn_server() -> Result<(SocketAddr, SharedStore), String> {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let app = create_api_router(Arc::clone(&store), &ApiConfig::default())
        .map_err(|e| e.to_string())?;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|e| e.to_string())?;
    let addr = listener.local_addr().map_err(|e| e.to_string())?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server stopped: {}", e);
        }
    });
    Ok((addr, store))
}

fn client_for(addr: SocketAddr) -> Result<RestClient, String> {
    RestClient::new(&ClientConfig::new(format!("http://{}/api/v1", addr))).map_err(|e| e.to_string())
}

#[tokio::test]
async fn test_full_crud_through_client() -> Result<(), String> {
    let (addr, store) = spawn_server().await?;
    let client = client_for(addr)?;

    let created = client
        .create_visualization(&CreateVisualizationRequest::new("Echo", "QQ=="))
        .await
        .map_err(|e| e.to_string())?;
    assert_eq!(created.agent_name, "Echo");

    let fetched = client
        .get_visualization(&created.id)
        .await
        .map_err(|e| e.to_string())?;
    assert_eq!(fetched, created);

    let update = UpdateVisualizationRequest {
        description: Some("v2".to_string()),
        ..Default::default()
    };
    let updated = client
        .update_visualization(&created.id, &update)
        .await
        .map_err(|e| e.to_string())?;
    assert_eq!(updated.description.as_deref(), Some("v2"));
    assert!(updated.updated_at > created.updated_at);

    let listing = client.list_visualizations().await.map_err(|e| e.to_string())?;
    assert_eq!(listing.count, 1);

    let deleted = client
        .delete_visualization(&created.id)
        .await
        .map_err(|e| e.to_string())?;
    assert_eq!(deleted.id, created.id);
    assert_eq!(store.len(), Ok(0));

    match client.get_visualization(&created.id).await {
        Err(ClientError::NotFound { path }) => assert!(path.ends_with(&created.id)),
        other => return Err(format!("Expected NotFound, got {:?}", other)),
    }
    Ok(())
}

#[tokio::test]
async fn test_unusual_ids_address_a_single_record() -> Result<(), String> {
    let (addr, _store) = spawn_server().await?;
    let client = client_for(addr)?;
    client
        .create_visualization(&CreateVisualizationRequest::new("Echo", "QQ=="))
        .await
        .map_err(|e| e.to_string())?;

    for id in ["?", "#", "a/b", "%2F"] {
        match client.get_visualization(id).await {
            Err(err) if err.is_not_found() => {}
            other => return Err(format!("Expected NotFound for {:?}, got {:?}", id, other)),
        }
    }

    match client.get_visualization("").await {
        Err(ClientError::InvalidId(_)) => {}
        other => return Err(format!("Expected InvalidId, got {:?}", other)),
    }
    match client.delete_visualization("").await {
        Err(ClientError::InvalidId(_)) => {}
        other => return Err(format!("Expected InvalidId, got {:?}", other)),
    }
    Ok(())
}

#[tokio::test]
async fn test_validation_errors_are_decoded() -> Result<(), String> {
    let (addr, _store) = spawn_server().await?;
    let client = client_for(addr)?;

    match client
        .create_visualization(&CreateVisualizationRequest::new("", "QQ=="))
        .await
    {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("agent_name"));
        }
        other => return Err(format!("Expected Api error, got {:?}", other)),
    }
    Ok(())
}

#[tokio::test]
async fn test_create_from_file_and_clear_all() -> Result<(), String> {
    let (addr, store) = spawn_server().await?;
    let client = client_for(addr)?;

    let path = std::env::temp_dir().join(format!("nowyouseeme-client-{}.png", std::process::id()));
    tokio::fs::write(&path, TINY_PNG).await.map_err(|e| e.to_string())?;
    let from_file = client
        .create_visualization_from_file("Prism", &path, Some("pixel".to_string()))
        .await;
    tokio::fs::remove_file(&path).await.map_err(|e| e.to_string())?;

    let from_file = from_file.map_err(|e| e.to_string())?;
    assert_eq!(from_file.image_data, tiny_png_base64());
    assert_eq!(from_file.description.as_deref(), Some("pixel"));

    for name in ["Echo", "Nova"] {
        client
            .create_visualization(&CreateVisualizationRequest::new(name, "QQ=="))
            .await
            .map_err(|e| e.to_string())?;
    }

    let deleted = client.clear_all().await.map_err(|e| e.to_string())?;
    assert_eq!(deleted, 3);
    assert_eq!(store.len(), Ok(0));
    assert_eq!(client.clear_all().await.map_err(|e| e.to_string())?, 0);
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> Result<(), String> {
    let (addr, _store) = spawn_server().await?;
    let health = client_for(addr)?
        .health_check()
        .await
        .map_err(|e| e.to_string())?;
    assert_eq!(health.status, HealthStatus::Healthy);
    Ok(())
}
