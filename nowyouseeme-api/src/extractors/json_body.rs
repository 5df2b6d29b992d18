//! JSON body extractor with API-shaped rejections.
//!
//! Unlike `axum::Json`, `JsonBody<T>`:
//! - accepts bodies whatever their `Content-Type`
//! - rejects malformed or mistyped JSON with a 400 `ApiError`
//! - keeps 413 for bodies over a configured `DefaultBodyLimit`

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Extractor that deserializes the request body as JSON into `T`.
///
/// # Example
///
/// ```rust,ignore
/// async fn create(
///     JsonBody(req): JsonBody<CreateVisualizationRequest>,
/// ) -> ApiResult<impl IntoResponse> {
///     req.validate()?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        let value = serde_json::from_slice(&bytes)?;
        Ok(Self(value))
    }
}
