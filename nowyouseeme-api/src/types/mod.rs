//! API request and response types.

mod health;
mod visualization;

pub use health::{ComponentHealth, HealthCheckResponse, HealthDetails, HealthResponse};
pub use visualization::{
    CreateVisualizationRequest, DeleteVisualizationResponse, ListVisualizationsResponse,
    UpdateVisualizationRequest,
};
