//! REST client for the visualization API.

use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use nowyouseeme_api::error::{ApiError as ApiServerError, ErrorCode};
use nowyouseeme_api::types::{
    CreateVisualizationRequest, DeleteVisualizationResponse, HealthCheckResponse,
    ListVisualizationsResponse, UpdateVisualizationRequest,
};
use nowyouseeme_core::Visualization;
use reqwest::{StatusCode, Url};

use crate::config::ClientConfig;
use crate::error::ClientError;

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(config.api_base_url.trim_end_matches('/')).map_err(|e| {
            ClientError::Config(format!("Invalid API URL {}: {}", config.api_base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "API URL cannot carry a path: {}",
                config.api_base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub async fn list_visualizations(&self) -> Result<ListVisualizationsResponse, ClientError> {
        self.get_json(self.endpoint(&["visualizations"])).await
    }

    pub async fn get_visualization(&self, id: &str) -> Result<Visualization, ClientError> {
        self.get_json(self.item_url(id)?).await
    }

    pub async fn create_visualization(
        &self,
        request: &CreateVisualizationRequest,
    ) -> Result<Visualization, ClientError> {
        let created: Visualization = self
            .post_json(self.endpoint(&["visualizations"]), request)
            .await?;
        tracing::debug!(id = %created.id, "Visualization created");
        Ok(created)
    }

    /// Read an image from disk, base64-encode it and create a record.
    pub async fn create_visualization_from_file(
        &self,
        agent_name: &str,
        image_path: impl AsRef<Path>,
        description: Option<String>,
    ) -> Result<Visualization, ClientError> {
        let image_data = encode_image_file(image_path).await?;
        let request = CreateVisualizationRequest {
            description,
            ..CreateVisualizationRequest::new(agent_name, image_data)
        };
        self.create_visualization(&request).await
    }

    pub async fn update_visualization(
        &self,
        id: &str,
        request: &UpdateVisualizationRequest,
    ) -> Result<Visualization, ClientError> {
        self.put_json(self.item_url(id)?, request).await
    }

    pub async fn delete_visualization(
        &self,
        id: &str,
    ) -> Result<DeleteVisualizationResponse, ClientError> {
        let url = self.item_url(id)?;
        let path = url.path().to_string();
        let response = self.client.delete(url).send().await?;
        self.parse_response(&path, response).await
    }

    /// Delete every stored visualization and return how many were removed.
    ///
    /// Records deleted concurrently by someone else are skipped.
    pub async fn clear_all(&self) -> Result<usize, ClientError> {
        let listing = self.list_visualizations().await?;
        let mut deleted = 0;
        for visualization in listing.visualizations {
            match self.delete_visualization(&visualization.id).await {
                Ok(_) => deleted += 1,
                Err(err) if err.is_not_found() => {
                    tracing::debug!(id = %visualization.id, "Already deleted");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(deleted)
    }

    pub async fn health_check(&self) -> Result<HealthCheckResponse, ClientError> {
        self.get_json(self.endpoint(&["health"])).await
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of a single record. An empty id would address the collection.
    fn item_url(&self, id: &str) -> Result<Url, ClientError> {
        if id.is_empty() {
            return Err(ClientError::InvalidId(id.to_string()));
        }
        Ok(self.endpoint(&["visualizations", id]))
    }

    async fn get_json<T>(&self, url: Url) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let path = url.path().to_string();
        let response = self.client.get(url).send().await?;
        self.parse_response(&path, response).await
    }

    async fn post_json<T, B>(&self, url: Url, body: &B) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let path = url.path().to_string();
        let response = self.client.post(url).json(body).send().await?;
        self.parse_response(&path, response).await
    }

    async fn put_json<T, B>(&self, url: Url, body: &B) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let path = url.path().to_string();
        let response = self.client.put(url).json(body).send().await?;
        self.parse_response(&path, response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await?;
        tracing::debug!(path, status = status.as_u16(), body = %text, "Request failed");
        Err(decode_error(path, status, &text))
    }
}

/// Turn a non-2xx response into a `ClientError`, preferring the server's
/// `{error, code}` body when it parses.
fn decode_error(path: &str, status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ApiServerError>(body) {
        Ok(api_error) if api_error.code == ErrorCode::VisualizationNotFound => {
            ClientError::NotFound {
                path: path.to_string(),
            }
        }
        Ok(api_error) => ClientError::Api {
            status: status.as_u16(),
            message: format!("{}: {}", api_error.code, api_error.message),
        },
        Err(_) if status == StatusCode::NOT_FOUND => ClientError::NotFound {
            path: path.to_string(),
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            message: body.to_string(),
        },
    }
}

/// Read a file and return its contents as standard base64.
pub async fn encode_image_file(path: impl AsRef<Path>) -> Result<String, ClientError> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    Ok(STANDARD.encode(bytes))
}
