//! Registering mocks and parameter-specific overrides.
//!
//! Both operations run inside one store transaction; any error leaves the
//! committed state untouched.

use super::types::{NewMock, NewOverride, Registered};
use crate::binding::{BindingId, HttpMethod};
use crate::error::MockError;
use crate::store::StoreState;
use crate::tree::{parse_pattern, NodeId, RouteTree, SegmentSpec};
use crate::workspace::WorkspaceId;

pub(crate) fn validate_status(status: i64) -> Result<u16, MockError> {
    match u16::try_from(status) {
        Ok(code) if (100..=599).contains(&code) => Ok(code),
        _ => Err(MockError::invalid(format!(
            "status [{status}] must be between 100 and 599"
        ))),
    }
}

/// Leaf for `segments` if every node along the way already exists.
fn existing_leaf(
    tree: &RouteTree,
    workspace_id: WorkspaceId,
    segments: &[SegmentSpec],
) -> Option<NodeId> {
    let mut parent = None;
    for spec in segments {
        parent = Some(tree.child(workspace_id, parent, spec.key())?.id);
    }
    parent
}

/// Register a generic response for `mock.path` and `mock.method`.
pub(crate) fn register(
    state: &mut StoreState,
    workspace_id: WorkspaceId,
    mock: &NewMock,
) -> Result<Registered, MockError> {
    let segments = parse_pattern(&mock.path)?;
    let method: HttpMethod = mock.method.parse()?;
    let status = validate_status(mock.status)?;

    if let Some(leaf) = existing_leaf(&state.tree, workspace_id, &segments) {
        if state.bindings.has_generic(leaf, method) {
            return Err(MockError::conflict("route already exists"));
        }
    }

    let mut parent = None;
    for spec in &segments {
        parent = Some(state.tree.get_or_create(parent, spec, workspace_id)?);
    }
    let leaf_id = parent.ok_or_else(|| MockError::invalid("path has no segments"))?;

    let binding_id =
        state
            .bindings
            .attach_generic(leaf_id, method, status, mock.response_body.clone())?;
    state.tree.mark_direct(leaf_id)?;

    Ok(Registered {
        binding_id,
        leaf_id,
    })
}

/// Attach an override to an existing mock's leaf.
///
/// The leaf must belong to `workspace_id` and already answer requests.
pub(crate) fn add_specific_override(
    state: &mut StoreState,
    workspace_id: WorkspaceId,
    leaf_id: NodeId,
    request: &NewOverride,
) -> Result<BindingId, MockError> {
    let method: HttpMethod = request.method.parse()?;
    let status = validate_status(request.status)?;

    match state.tree.get(leaf_id) {
        Some(node) if node.workspace_id == workspace_id && node.has_direct_responses => {}
        _ => {
            return Err(MockError::not_found(format!(
                "mock {leaf_id} in workspace {workspace_id}"
            )))
        }
    }

    let params = request
        .path_params
        .clone()
        .ok_or_else(|| MockError::invalid("path params are required"))?
        .into_bindings()?;

    state.bindings.attach_specific(
        &state.tree,
        leaf_id,
        method,
        params,
        status,
        request.response.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ParamBindingsInput;
    use crate::tree::PARAM_SENTINEL;

    const WS: WorkspaceId = WorkspaceId(1);

    fn mock(path: &str, method: &str, status: i64) -> NewMock {
        NewMock {
            path: path.to_string(),
            method: method.to_string(),
            status,
            response_body: None,
        }
    }

    fn override_for(pairs: &str, status: i64) -> NewOverride {
        NewOverride {
            method: "GET".to_string(),
            path_params: Some(ParamBindingsInput::Text(pairs.to_string())),
            status,
            response: None,
        }
    }

    #[test]
    fn test_validate_status_bounds() {
        assert_eq!(validate_status(100).unwrap(), 100);
        assert_eq!(validate_status(599).unwrap(), 599);
        assert!(validate_status(99).is_err());
        assert!(validate_status(600).is_err());
        assert!(validate_status(-200).is_err());
        assert!(validate_status(70_000).is_err());
    }

    #[test]
    fn test_register_creates_chain() {
        let mut state = StoreState::default();
        let registered = register(&mut state, WS, &mock("/resources/:resourceId", "get", 200))
            .unwrap();

        assert_eq!(state.tree.len(), 2);
        let leaf = state.tree.get(registered.leaf_id).unwrap();
        assert!(leaf.is_param);
        assert!(leaf.has_direct_responses);
        assert_eq!(leaf.segment, PARAM_SENTINEL);
        assert_eq!(leaf.param_name.as_deref(), Some("resourceId"));

        let parent = state.tree.get(leaf.parent_id.unwrap()).unwrap();
        assert_eq!(parent.segment, "/resources");
        assert!(!parent.has_direct_responses);

        let binding = state.bindings.get(registered.binding_id).unwrap();
        assert_eq!(binding.method, HttpMethod::Get);
        assert!(binding.is_generic());
    }

    #[test]
    fn test_prefix_sharing() {
        let mut state = StoreState::default();
        register(&mut state, WS, &mock("/a/b", "GET", 200)).unwrap();
        register(&mut state, WS, &mock("/a/c", "GET", 200)).unwrap();

        assert_eq!(state.tree.len(), 3);
        let a = state.tree.child(WS, None, "/a").unwrap().id;
        assert_eq!(state.tree.children(WS, Some(a)).count(), 2);
    }

    #[test]
    fn test_duplicate_registration_conflicts_without_new_nodes() {
        let mut state = StoreState::default();
        register(&mut state, WS, &mock("/a/b", "GET", 200)).unwrap();

        let err = register(&mut state, WS, &mock("/a/b", "GET", 201)).unwrap_err();
        assert!(matches!(err, MockError::Conflict(_)));
        assert_eq!(state.tree.len(), 2);
        assert_eq!(state.bindings.len(), 1);
    }

    #[test]
    fn test_other_method_on_same_leaf_is_allowed() {
        let mut state = StoreState::default();
        let get = register(&mut state, WS, &mock("/a", "GET", 200)).unwrap();
        let post = register(&mut state, WS, &mock("/a", "POST", 201)).unwrap();
        assert_eq!(get.leaf_id, post.leaf_id);
        assert_eq!(state.bindings.len(), 2);
    }

    #[test]
    fn test_intermediate_node_can_become_a_leaf() {
        let mut state = StoreState::default();
        register(&mut state, WS, &mock("/a/b", "GET", 200)).unwrap();
        let a = register(&mut state, WS, &mock("/a", "GET", 200)).unwrap();
        assert_eq!(state.tree.len(), 2);
        assert!(state.tree.get(a.leaf_id).unwrap().has_direct_responses);
    }

    #[test]
    fn test_param_sentinel_collision() {
        let mut state = StoreState::default();
        let id = register(&mut state, WS, &mock("/items/:id", "GET", 200)).unwrap();
        let sku = register(&mut state, WS, &mock("/items/:sku", "POST", 200)).unwrap();
        assert_eq!(id.leaf_id, sku.leaf_id);
        assert_eq!(state.tree.len(), 2);

        // Same method on the shared node is the same route
        let err = register(&mut state, WS, &mock("/items/:sku", "GET", 200)).unwrap_err();
        assert!(matches!(err, MockError::Conflict(_)));
    }

    #[test]
    fn test_invalid_input_is_rejected_before_any_write() {
        let mut state = StoreState::default();
        for bad in [
            mock("/a b", "GET", 200),
            mock("/a", "BREW", 200),
            mock("/a", "GET", 42),
            mock("/a/:", "GET", 200),
        ] {
            let err = register(&mut state, WS, &bad).unwrap_err();
            assert!(matches!(err, MockError::InvalidInput(_)), "{bad:?}");
        }
        assert!(state.tree.is_empty());
    }

    #[test]
    fn test_override_requires_direct_leaf() {
        let mut state = StoreState::default();
        let registered = register(&mut state, WS, &mock("/items/:id/details", "GET", 200)).unwrap();
        let parent = state
            .tree
            .get(registered.leaf_id)
            .and_then(|n| n.parent_id)
            .unwrap();

        let err = add_specific_override(&mut state, WS, parent, &override_for("id: 1", 200))
            .unwrap_err();
        assert!(matches!(err, MockError::NotFound(_)));

        let err = add_specific_override(&mut state, WS, NodeId(999), &override_for("id: 1", 200))
            .unwrap_err();
        assert!(matches!(err, MockError::NotFound(_)));

        let err = add_specific_override(
            &mut state,
            WorkspaceId(2),
            registered.leaf_id,
            &override_for("id: 1", 200),
        )
        .unwrap_err();
        assert!(matches!(err, MockError::NotFound(_)));

        add_specific_override(&mut state, WS, registered.leaf_id, &override_for("id: 1", 404))
            .unwrap();
    }

    #[test]
    fn test_override_validation() {
        let mut state = StoreState::default();
        let leaf = register(&mut state, WS, &mock("/items/:id", "GET", 200))
            .unwrap()
            .leaf_id;

        let missing = NewOverride {
            path_params: None,
            ..override_for("", 200)
        };
        assert!(matches!(
            add_specific_override(&mut state, WS, leaf, &missing),
            Err(MockError::InvalidInput(_))
        ));
        assert!(matches!(
            add_specific_override(&mut state, WS, leaf, &override_for("sku: 1", 200)),
            Err(MockError::InvalidInput(_))
        ));
        assert!(matches!(
            add_specific_override(&mut state, WS, leaf, &override_for("id: 1", 600)),
            Err(MockError::InvalidInput(_))
        ));

        add_specific_override(&mut state, WS, leaf, &override_for("id: 1", 404)).unwrap();
        assert!(matches!(
            add_specific_override(&mut state, WS, leaf, &override_for("id: 1", 500)),
            Err(MockError::Conflict(_))
        ));
    }
}
