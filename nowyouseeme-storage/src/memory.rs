//! In-memory store backed by a `HashMap` behind a single `RwLock`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use nowyouseeme_core::{StoreError, StoreResult, Visualization, VisualizationId};

use crate::{ReplaceFn, VisualizationStore};

/// Process-local visualization store.
///
/// Reads take the shared lock, every mutation takes the exclusive lock for
/// its full duration. Cloning yields another handle to the same map.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    visualizations: Arc<RwLock<HashMap<VisualizationId, Visualization>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<VisualizationId, Visualization>>> {
        self.visualizations
            .read()
            .map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<VisualizationId, Visualization>>> {
        self.visualizations
            .write()
            .map_err(|_| StoreError::LockPoisoned)
    }
}

impl VisualizationStore for MemoryStore {
    fn create(&self, visualization: Visualization) -> StoreResult<()> {
        let mut visualizations = self.write()?;
        if visualizations.contains_key(&visualization.id) {
            return Err(StoreError::already_exists(visualization.id));
        }
        tracing::trace!(id = %visualization.id, "store insert");
        visualizations.insert(visualization.id.clone(), visualization);
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Visualization> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn list(&self) -> StoreResult<Vec<Visualization>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn update(&self, id: &str, mut visualization: Visualization) -> StoreResult<()> {
        let mut visualizations = self.write()?;
        let slot = visualizations
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id))?;
        visualization.id = id.to_string();
        *slot = visualization;
        Ok(())
    }

    fn replace_with<'a>(&self, id: &str, f: ReplaceFn<'a>) -> StoreResult<Visualization> {
        let mut visualizations = self.write()?;
        let slot = visualizations
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id))?;
        let mut replacement = f(slot.clone());
        replacement.id = id.to_string();
        *slot = replacement.clone();
        Ok(replacement)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }
}
