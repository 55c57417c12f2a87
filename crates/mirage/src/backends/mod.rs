//! Persistence backends for the mock store.
//!
//! A backend only loads and saves whole snapshots; atomicity and isolation
//! are provided by [`crate::store::MockStore`].

mod file;
mod inmemory;

pub use file::FileBackend;
pub use inmemory::InMemoryBackend;

use crate::config::StorageConfig;
use crate::store::StoreState;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Backend-agnostic snapshot persistence.
///
/// Synchronous: writes happen while the store's writer lock is held.
pub trait StateBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Previously persisted state, if any.
    fn load(&self) -> Result<Option<StoreState>>;

    /// Durably record `state`. An error aborts the surrounding transaction.
    fn persist(&self, state: &StoreState) -> Result<()>;
}

/// Pick the backend described by the storage configuration.
pub fn create_backend(config: &StorageConfig) -> Arc<dyn StateBackend> {
    match config.durable_path() {
        Some(path) => {
            info!("Using file-backed store at {}", path.display());
            Arc::new(FileBackend::new(path))
        }
        None => {
            info!("Using in-memory store (nothing survives a restart)");
            Arc::new(InMemoryBackend)
        }
    }
}
