//! NowYouSeeMe Core - Entity Types
//!
//! Pure data structures shared by the store, the API layer and the client.
//! Business rules about how requests map onto records live in the API crate.

pub mod error;
pub mod health;
pub mod visualization;

pub use error::{StoreError, StoreResult};
pub use health::HealthStatus;
pub use visualization::{
    new_visualization_id, next_update_timestamp, Timestamp, VersionRecord, Visualization,
    VisualizationId, VisualizationMetadata,
};
