//! MockManager - the write and listing surface over the mock store.

use super::listing;
use super::registration;
use super::types::{MockSummary, NewMock, NewOverride, Registered};
use crate::binding::BindingId;
use crate::error::MockError;
use crate::metrics;
use crate::store::MockStore;
use crate::tree::NodeId;
use crate::workspace::{Page, Workspace, WorkspaceId, DEFAULT_WORKSPACE_ID};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registers mocks, overrides and workspaces, and lists what is stored.
#[derive(Clone)]
pub struct MockManager {
    store: Arc<MockStore>,
}

fn outcome<T>(result: &Result<T, MockError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

impl MockManager {
    pub fn new(store: Arc<MockStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<MockStore> {
        &self.store
    }

    /// Register a generic mock for a path pattern and method.
    pub fn register(
        &self,
        workspace_id: WorkspaceId,
        mock: &NewMock,
    ) -> Result<Registered, MockError> {
        let result = self
            .store
            .transaction(|state| registration::register(state, workspace_id, mock));
        metrics::record_registration("mock", outcome(&result));

        match &result {
            Ok(registered) => info!(
                workspace = %workspace_id,
                path = %mock.path,
                method = %mock.method,
                leaf = %registered.leaf_id,
                "Registered mock"
            ),
            Err(MockError::Storage(e)) => warn!(path = %mock.path, "Mock registration failed: {:#}", e),
            Err(e) => debug!(path = %mock.path, "Mock registration rejected: {}", e),
        }
        result
    }

    /// Attach a parameter-specific response to the mock at `leaf_id`.
    pub fn add_specific_override(
        &self,
        workspace_id: WorkspaceId,
        leaf_id: NodeId,
        request: &NewOverride,
    ) -> Result<BindingId, MockError> {
        let result = self.store.transaction(|state| {
            registration::add_specific_override(state, workspace_id, leaf_id, request)
        });
        metrics::record_registration("override", outcome(&result));

        match &result {
            Ok(id) => info!(
                workspace = %workspace_id,
                leaf = %leaf_id,
                binding = %id,
                "Registered override"
            ),
            Err(MockError::Storage(e)) => warn!(leaf = %leaf_id, "Override registration failed: {:#}", e),
            Err(e) => debug!(leaf = %leaf_id, "Override rejected: {}", e),
        }
        result
    }

    pub fn list_mocks(&self, workspace_id: WorkspaceId) -> Result<Vec<MockSummary>, MockError> {
        listing::list_mocks(&self.store.snapshot(), workspace_id)
    }

    pub fn create_workspace(
        &self,
        name: &str,
        description: &str,
    ) -> Result<WorkspaceId, MockError> {
        let result = self
            .store
            .transaction(|state| state.workspaces.create(name, description));
        metrics::record_registration("workspace", outcome(&result));
        if let Ok(id) = &result {
            info!(workspace = %id, name = name.trim(), "Created workspace");
        }
        result
    }

    pub fn list_workspaces(&self, page: i64, size: i64) -> Result<Page<Workspace>, MockError> {
        self.store.snapshot().workspaces.page(page, size)
    }

    pub fn workspace_exists(&self, workspace_id: WorkspaceId) -> bool {
        self.store.snapshot().workspaces.contains(workspace_id)
    }

    /// Make sure the default workspace row exists.
    pub fn ensure_default_workspace(&self) -> Result<(), MockError> {
        if self.workspace_exists(DEFAULT_WORKSPACE_ID) {
            return Ok(());
        }
        let created = self
            .store
            .transaction(|state| Ok(state.workspaces.ensure_default()))?;
        if created {
            info!(workspace = %DEFAULT_WORKSPACE_ID, "Created default workspace");
        }
        Ok(())
    }
}
