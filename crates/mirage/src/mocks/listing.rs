use super::types::MockSummary;
use crate::error::MockError;
use crate::store::StoreState;
use crate::workspace::WorkspaceId;

/// Every generic mock in `workspace_id`, in registration order.
///
/// Specific overrides are not listed; they hang off the mock whose
/// `direct_path_id` they were attached to.
pub(crate) fn list_mocks(
    state: &StoreState,
    workspace_id: WorkspaceId,
) -> Result<Vec<MockSummary>, MockError> {
    let listings = state
        .bindings
        .list_generic_by_workspace(&state.tree, workspace_id)?;

    Ok(listings
        .into_iter()
        .map(|listing| MockSummary {
            response_id: listing.binding.id,
            full_path: listing.full_path,
            param_names: listing.param_names,
            method: listing.binding.method.to_string(),
            response_body: listing.binding.body.clone(),
            status: listing.binding.status,
            direct_path_id: listing.binding.node_id,
        })
        .collect())
}
