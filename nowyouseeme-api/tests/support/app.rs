#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use nowyouseeme_api::{create_api_router, ApiConfig};
use nowyouseeme_storage::{MemoryStore, SharedStore};
use serde_json::Value;
use tower::ServiceExt;

/// In-process server over a fresh memory store. Clones share the store.
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub store: SharedStore,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value, String> {
        serde_json::from_slice(&self.body)
            .map_err(|e| format!("Body is not JSON ({}): {:?}", e, String::from_utf8_lossy(&self.body)))
    }
}

impl TestApp {
    pub fn new() -> Result<Self, String> {
        Self::with_config(ApiConfig::default())
    }

    pub fn with_config(config: ApiConfig) -> Result<Self, String> {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let router = create_api_router(Arc::clone(&store), &config).map_err(|e| e.to_string())?;
        Ok(Self { router, store })
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
    ) -> Result<TestResponse, String> {
        self.send_with_headers(method, uri, body, &[]).await
    }

    pub async fn send_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
        headers: &[(&str, &str)],
    ) -> Result<TestResponse, String> {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(|e| e.to_string())?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| format!("Failed to read body: {:?}", e))?;
        Ok(TestResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        body: &Value,
    ) -> Result<TestResponse, String> {
        self.send(method, uri, Some(body.to_string())).await
    }
}
