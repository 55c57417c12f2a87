//! Response bindings attached to tree leaves.
//!
//! Each `(node, method)` pair has at most one generic binding and any number
//! of specific overrides, one per distinct parameter map. The key index is
//! the uniqueness constraint for `(node, method, params)`.

use super::method::HttpMethod;
use super::params::{format_params, ParamBindings};
use crate::error::MockError;
use crate::tree::{param_names, render_template, NodeId, RouteTree};
use crate::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BindingId(pub u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBinding {
    pub id: BindingId,
    pub node_id: NodeId,
    pub method: HttpMethod,
    /// `None` for the generic binding of a `(node, method)` pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_bindings: Option<ParamBindings>,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ResponseBinding {
    pub fn is_generic(&self) -> bool {
        self.param_bindings.is_none()
    }

    fn key(&self) -> BindingKey {
        BindingKey {
            node_id: self.node_id,
            method: self.method,
            params: self.param_bindings.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BindingKey {
    node_id: NodeId,
    method: HttpMethod,
    params: Option<ParamBindings>,
}

/// A generic binding with the pattern it answers for.
#[derive(Debug, Clone)]
pub struct GenericListing<'a> {
    pub binding: &'a ResponseBinding,
    pub full_path: String,
    pub param_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "BindingRecord", into = "BindingRecord")]
pub struct BindingTable {
    bindings: BTreeMap<BindingId, ResponseBinding>,
    keys: HashMap<BindingKey, BindingId>,
    by_node: HashMap<NodeId, Vec<BindingId>>,
    next_id: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BindingRecord {
    next_id: u64,
    bindings: Vec<ResponseBinding>,
}

impl From<BindingTable> for BindingRecord {
    fn from(table: BindingTable) -> Self {
        Self {
            next_id: table.next_id,
            bindings: table.bindings.into_values().collect(),
        }
    }
}

impl TryFrom<BindingRecord> for BindingTable {
    type Error = String;

    fn try_from(record: BindingRecord) -> Result<Self, Self::Error> {
        let mut table = BindingTable {
            next_id: record.next_id,
            ..Default::default()
        };
        for binding in record.bindings {
            if binding.id.0 > record.next_id {
                return Err(format!("binding {} is beyond the id counter", binding.id));
            }
            table.insert(binding).map_err(|e| e.to_string())?;
        }
        Ok(table)
    }
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, id: BindingId) -> Option<&ResponseBinding> {
        self.bindings.get(&id)
    }

    /// All bindings in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ResponseBinding> {
        self.bindings.values()
    }

    /// Bindings attached to `node_id`, in id order.
    pub fn for_node(&self, node_id: NodeId) -> impl Iterator<Item = &ResponseBinding> {
        self.by_node
            .get(&node_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.bindings.get(id))
    }

    pub fn has_generic(&self, node_id: NodeId, method: HttpMethod) -> bool {
        self.keys.contains_key(&BindingKey {
            node_id,
            method,
            params: None,
        })
    }

    /// Attach the generic binding for `(node, method)`.
    pub fn attach_generic(
        &mut self,
        node_id: NodeId,
        method: HttpMethod,
        status: u16,
        body: Option<String>,
    ) -> Result<BindingId, MockError> {
        if self.has_generic(node_id, method) {
            return Err(MockError::conflict("route already exists"));
        }
        self.push(node_id, method, None, status, body)
    }

    /// Attach an override used only when the request carries exactly
    /// `params` for the pattern's parameter segments.
    ///
    /// The names in `params` must be exactly the parameter names on the
    /// leaf's ancestor chain; values must be non-empty and free of `/`.
    pub fn attach_specific(
        &mut self,
        tree: &RouteTree,
        node_id: NodeId,
        method: HttpMethod,
        params: ParamBindings,
        status: u16,
        body: Option<String>,
    ) -> Result<BindingId, MockError> {
        if params.is_empty() {
            return Err(MockError::invalid("path params are required"));
        }

        let chain = tree.ancestor_chain(node_id)?;
        let expected: BTreeSet<String> = param_names(&chain).into_iter().collect();
        let given: BTreeSet<String> = params.keys().cloned().collect();
        if expected != given {
            return Err(MockError::invalid(format!(
                "path params [{}] do not match the parameters of {} (expected [{}])",
                given.into_iter().collect::<Vec<_>>().join(", "),
                render_template(&chain),
                expected.into_iter().collect::<Vec<_>>().join(", "),
            )));
        }
        if let Some((name, _)) = params
            .iter()
            .find(|(_, value)| value.is_empty() || value.contains('/'))
        {
            return Err(MockError::invalid(format!(
                "path param [{name}] must be a non-empty value without '/'"
            )));
        }

        let key = BindingKey {
            node_id,
            method,
            params: Some(params),
        };
        if self.keys.contains_key(&key) {
            return Err(MockError::conflict(
                "a response for these path params already exists",
            ));
        }
        self.push(node_id, method, key.params, status, body)
    }

    fn push(
        &mut self,
        node_id: NodeId,
        method: HttpMethod,
        param_bindings: Option<ParamBindings>,
        status: u16,
        body: Option<String>,
    ) -> Result<BindingId, MockError> {
        let id = BindingId(self.next_id + 1);
        self.insert(ResponseBinding {
            id,
            node_id,
            method,
            param_bindings,
            status,
            body,
        })?;
        Ok(id)
    }

    /// Insert a fully formed binding, enforcing key uniqueness.
    pub fn insert(&mut self, binding: ResponseBinding) -> Result<(), MockError> {
        if self.bindings.contains_key(&binding.id) {
            return Err(MockError::conflict(format!(
                "binding {} already exists",
                binding.id
            )));
        }
        let key = binding.key();
        if self.keys.contains_key(&key) {
            return Err(MockError::conflict(
                "UNIQUE constraint failed: binding already exists",
            ));
        }
        self.keys.insert(key, binding.id);
        self.by_node.entry(binding.node_id).or_default().push(binding.id);
        self.next_id = self.next_id.max(binding.id.0);
        self.bindings.insert(binding.id, binding);
        Ok(())
    }

    /// Every generic binding in `workspace_id`, by binding id, with the full
    /// pattern reconstructed from its leaf.
    pub fn list_generic_by_workspace<'a>(
        &'a self,
        tree: &RouteTree,
        workspace_id: WorkspaceId,
    ) -> Result<Vec<GenericListing<'a>>, MockError> {
        let mut listings = Vec::new();
        for binding in self.bindings.values().filter(|b| b.is_generic()) {
            let Some(leaf) = tree.get(binding.node_id) else {
                continue;
            };
            if leaf.workspace_id != workspace_id {
                continue;
            }
            let chain = tree.ancestor_chain(leaf.id)?;
            listings.push(GenericListing {
                binding,
                full_path: render_template(&chain),
                param_names: param_names(&chain),
            });
        }
        Ok(listings)
    }

    /// Bindings for `method` on any of `node_ids`.
    ///
    /// Specific overrides come first, ordered by the position of their node
    /// in `node_ids` and then by their text form; generic bindings follow in
    /// node order.
    pub fn find_candidates(
        &self,
        node_ids: &[NodeId],
        method: HttpMethod,
    ) -> Vec<&ResponseBinding> {
        let mut candidates: Vec<(bool, usize, String, &ResponseBinding)> = node_ids
            .iter()
            .enumerate()
            .flat_map(|(rank, node_id)| {
                self.for_node(*node_id)
                    .filter(move |b| b.method == method)
                    .map(move |b| {
                        let order = b
                            .param_bindings
                            .as_ref()
                            .map(format_params)
                            .unwrap_or_default();
                        (b.is_generic(), rank, order, b)
                    })
            })
            .collect();

        candidates.sort_by(|a, b| (a.0, a.1, &a.2).cmp(&(b.0, b.1, &b.2)));
        candidates.into_iter().map(|(_, _, _, b)| b).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::segments_of;

    const WS: WorkspaceId = WorkspaceId(1);

    fn leaf(tree: &mut RouteTree, pattern: &str) -> NodeId {
        let mut parent = None;
        for spec in segments_of(pattern) {
            parent = Some(tree.get_or_create(parent, &spec, WS).unwrap());
        }
        parent.unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> ParamBindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_one_generic_per_node_and_method() {
        let mut tree = RouteTree::new();
        let node = leaf(&mut tree, "/items/:id");
        let mut table = BindingTable::new();

        table.attach_generic(node, HttpMethod::Get, 200, None).unwrap();
        table.attach_generic(node, HttpMethod::Post, 201, None).unwrap();
        let err = table
            .attach_generic(node, HttpMethod::Get, 500, None)
            .unwrap_err();
        assert!(matches!(err, MockError::Conflict(_)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_specific_overrides_are_unique_per_params() {
        let mut tree = RouteTree::new();
        let node = leaf(&mut tree, "/items/:id");
        let mut table = BindingTable::new();

        table
            .attach_specific(&tree, node, HttpMethod::Get, params(&[("id", "1")]), 200, None)
            .unwrap();
        table
            .attach_specific(&tree, node, HttpMethod::Get, params(&[("id", "2")]), 200, None)
            .unwrap();
        let dup = table.attach_specific(
            &tree,
            node,
            HttpMethod::Get,
            params(&[("id", "1")]),
            404,
            None,
        );
        assert!(matches!(dup, Err(MockError::Conflict(_))));
    }

    #[test]
    fn test_specific_requires_matching_param_names() {
        let mut tree = RouteTree::new();
        let node = leaf(&mut tree, "/users/:userId/orders/:orderId");
        let mut table = BindingTable::new();

        let empty = table.attach_specific(&tree, node, HttpMethod::Get, params(&[]), 200, None);
        assert!(matches!(empty, Err(MockError::InvalidInput(_))));

        let unknown = table.attach_specific(
            &tree,
            node,
            HttpMethod::Get,
            params(&[("userId", "1"), ("nope", "2")]),
            200,
            None,
        );
        assert!(matches!(unknown, Err(MockError::InvalidInput(_))));

        let partial = table.attach_specific(
            &tree,
            node,
            HttpMethod::Get,
            params(&[("userId", "1")]),
            200,
            None,
        );
        assert!(matches!(partial, Err(MockError::InvalidInput(_))));

        let slash = table.attach_specific(
            &tree,
            node,
            HttpMethod::Get,
            params(&[("userId", "1/2"), ("orderId", "3")]),
            200,
            None,
        );
        assert!(matches!(slash, Err(MockError::InvalidInput(_))));

        table
            .attach_specific(
                &tree,
                node,
                HttpMethod::Get,
                params(&[("userId", "1"), ("orderId", "3")]),
                200,
                None,
            )
            .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_find_candidates_orders_specific_first() {
        let mut tree = RouteTree::new();
        let node = leaf(&mut tree, "/items/:id");
        let mut table = BindingTable::new();

        table.attach_generic(node, HttpMethod::Get, 200, None).unwrap();
        table
            .attach_specific(&tree, node, HttpMethod::Get, params(&[("id", "b")]), 201, None)
            .unwrap();
        table
            .attach_specific(&tree, node, HttpMethod::Get, params(&[("id", "a")]), 202, None)
            .unwrap();
        table
            .attach_specific(&tree, node, HttpMethod::Post, params(&[("id", "a")]), 203, None)
            .unwrap();

        let statuses: Vec<u16> = table
            .find_candidates(&[node], HttpMethod::Get)
            .iter()
            .map(|b| b.status)
            .collect();
        assert_eq!(statuses, vec![202, 201, 200]);
    }

    #[test]
    fn test_find_candidates_respects_node_rank() {
        let mut tree = RouteTree::new();
        let literal = leaf(&mut tree, "/items/special");
        let param = leaf(&mut tree, "/items/:id");
        let mut table = BindingTable::new();

        table.attach_generic(param, HttpMethod::Get, 200, None).unwrap();
        table.attach_generic(literal, HttpMethod::Get, 201, None).unwrap();

        let first = table.find_candidates(&[literal, param], HttpMethod::Get)[0];
        assert_eq!(first.status, 201);
        let first = table.find_candidates(&[param, literal], HttpMethod::Get)[0];
        assert_eq!(first.status, 200);
    }

    #[test]
    fn test_list_generic_by_workspace() {
        let mut tree = RouteTree::new();
        let a = leaf(&mut tree, "/a/:x");
        let other = tree
            .get_or_create(None, &segments_of("/a")[0], WorkspaceId(2))
            .unwrap();
        let mut table = BindingTable::new();

        table.attach_generic(a, HttpMethod::Get, 200, None).unwrap();
        table
            .attach_specific(&tree, a, HttpMethod::Get, params(&[("x", "1")]), 404, None)
            .unwrap();
        table.attach_generic(other, HttpMethod::Get, 200, None).unwrap();

        let listings = table.list_generic_by_workspace(&tree, WS).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].full_path, "/a/:x");
        assert_eq!(listings[0].param_names, vec!["x"]);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut tree = RouteTree::new();
        let node = leaf(&mut tree, "/items/:id");
        let mut table = BindingTable::new();
        table
            .attach_generic(node, HttpMethod::Get, 200, Some("ok".to_string()))
            .unwrap();
        table
            .attach_specific(&tree, node, HttpMethod::Get, params(&[("id", "7")]), 404, None)
            .unwrap();

        let json = serde_json::to_string(&table).unwrap();
        let mut restored: BindingTable = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert!(restored.has_generic(node, HttpMethod::Get));

        let next = restored
            .attach_generic(node, HttpMethod::Put, 204, None)
            .unwrap();
        assert_eq!(next, BindingId(3));
    }
}
