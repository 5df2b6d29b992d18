//! NowYouSeeMe Storage - Store Trait and In-Memory Implementation
//!
//! Defines the storage abstraction for visualization records. The only
//! implementation is process-local; nothing survives a restart.

pub mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use nowyouseeme_core::{StoreResult, Visualization};

/// Boxed transformation applied by [`VisualizationStore::replace_with`].
pub type ReplaceFn<'a> = Box<dyn FnOnce(Visualization) -> Visualization + Send + 'a>;

/// Shared handle to a store, as held by request handlers.
pub type SharedStore = Arc<dyn VisualizationStore>;

/// Keyed collection of visualization records.
///
/// Every operation is atomic with respect to the others: readers never see
/// a partially applied write.
pub trait VisualizationStore: Send + Sync {
    /// Insert a new record. Fails with `AlreadyExists` when the id is taken.
    fn create(&self, visualization: Visualization) -> StoreResult<()>;

    /// Fetch a record by id. Fails with `NotFound` when absent.
    fn get(&self, id: &str) -> StoreResult<Visualization>;

    /// Every stored record, in no particular order.
    fn list(&self) -> StoreResult<Vec<Visualization>>;

    /// Replace the stored record wholesale. Fails with `NotFound` when absent.
    ///
    /// The stored record keeps `id` as its identifier whatever `visualization.id`
    /// says.
    fn update(&self, id: &str, visualization: Visualization) -> StoreResult<()>;

    /// Replace a record with the result of `f` applied to its current value,
    /// holding the write lock across the whole read-modify-write.
    ///
    /// Returns the record as stored. Fails with `NotFound` when absent, in
    /// which case `f` is never called.
    fn replace_with<'a>(&self, id: &str, f: ReplaceFn<'a>) -> StoreResult<Visualization>;

    /// Remove a record. Fails with `NotFound` when absent.
    fn delete(&self, id: &str) -> StoreResult<()>;

    /// Number of stored records.
    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
