//! Transactional store holding workspaces, the pattern tree, and bindings.
//!
//! Readers load the current snapshot and never wait on writers. Writers are
//! serialized, mutate a private copy, persist it through the backend, and
//! publish it with one pointer swap. A failed write publishes nothing.

use crate::backends::{InMemoryBackend, StateBackend};
use crate::binding::BindingTable;
use crate::error::MockError;
use crate::tree::RouteTree;
use crate::workspace::WorkspaceTable;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the store owns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    #[serde(default)]
    pub workspaces: WorkspaceTable,
    #[serde(default)]
    pub tree: RouteTree,
    #[serde(default)]
    pub bindings: BindingTable,
}

impl StoreState {
    /// Cross-table checks for a loaded snapshot: every binding sits on an
    /// existing node flagged as answering directly.
    pub fn validate(&self) -> Result<(), MockError> {
        for binding in self.bindings.iter() {
            match self.tree.get(binding.node_id) {
                Some(node) if node.has_direct_responses => {}
                Some(node) => {
                    return Err(MockError::Storage(anyhow::anyhow!(
                        "node {} has bindings but is not flagged as direct",
                        node.id
                    )))
                }
                None => {
                    return Err(MockError::Storage(anyhow::anyhow!(
                        "binding {} refers to missing node {}",
                        binding.id,
                        binding.node_id
                    )))
                }
            }
        }
        Ok(())
    }
}

pub struct MockStore {
    state: ArcSwap<StoreState>,
    writer: Mutex<()>,
    backend: Arc<dyn StateBackend>,
}

impl MockStore {
    /// Open a store, loading any snapshot the backend already holds.
    pub fn open(backend: Arc<dyn StateBackend>) -> Result<Self, MockError> {
        let state = backend.load()?.unwrap_or_default();
        state.validate()?;
        info!(
            backend = backend.name(),
            nodes = state.tree.len(),
            bindings = state.bindings.len(),
            "Mock store opened"
        );
        Ok(Self {
            state: ArcSwap::from_pointee(state),
            writer: Mutex::new(()),
            backend,
        })
    }

    /// Store with no persistence.
    pub fn in_memory() -> Self {
        Self {
            state: ArcSwap::from_pointee(StoreState::default()),
            writer: Mutex::new(()),
            backend: Arc::new(InMemoryBackend),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Consistent read-only view of the committed state.
    pub fn snapshot(&self) -> Arc<StoreState> {
        self.state.load_full()
    }

    /// Run `f` against a private copy of the state and commit it only if
    /// `f` and the backend both succeed.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> Result<T, MockError>,
    ) -> Result<T, MockError> {
        let _guard = self.writer.lock();

        let mut working = StoreState::clone(&self.state.load());
        let value = match f(&mut working) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Transaction rolled back");
                return Err(e);
            }
        };

        self.backend.persist(&working)?;
        self.state.store(Arc::new(working));
        Ok(value)
    }
}
