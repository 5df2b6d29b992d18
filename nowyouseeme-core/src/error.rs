//! Error types for store operations

use thiserror::Error;

use crate::VisualizationId;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Visualization not found: {id}")]
    NotFound { id: VisualizationId },

    #[error("Visualization with id {id} already exists")]
    AlreadyExists { id: VisualizationId },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn not_found(id: impl Into<VisualizationId>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn already_exists(id: impl Into<VisualizationId>) -> Self {
        Self::AlreadyExists { id: id.into() }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// TESTS
// =============================================================================
