//! Arena of route nodes with a parent-keyed sibling index.
//!
//! The sibling index maps `(workspace, parent)` to the children under it,
//! keyed by stored segment. It is the uniqueness constraint for
//! `(segment, parent, workspace)`: [`RouteTree::insert`] refuses a second node
//! under an occupied key no matter what the caller checked beforehand.

use super::node::{Node, NodeId};
use super::segment::SegmentSpec;
use crate::error::MockError;
use crate::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

type ParentKey = (WorkspaceId, Option<NodeId>);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "TreeRecord", into = "TreeRecord")]
pub struct RouteTree {
    nodes: BTreeMap<NodeId, Node>,
    siblings: HashMap<ParentKey, BTreeMap<String, NodeId>>,
    next_id: u64,
}

/// Persisted form: the node rows only. The sibling index is rebuilt on load.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeRecord {
    next_id: u64,
    nodes: Vec<Node>,
}

impl From<RouteTree> for TreeRecord {
    fn from(tree: RouteTree) -> Self {
        Self {
            next_id: tree.next_id,
            nodes: tree.nodes.into_values().collect(),
        }
    }
}

impl TryFrom<TreeRecord> for RouteTree {
    type Error = String;

    fn try_from(record: TreeRecord) -> Result<Self, Self::Error> {
        let mut tree = RouteTree {
            next_id: record.next_id,
            ..Default::default()
        };

        for node in record.nodes {
            if !node.is_consistent() {
                return Err(format!("node {} has inconsistent parameter fields", node.id));
            }
            if node.id.0 > tree.next_id {
                return Err(format!("node {} is beyond the id counter", node.id));
            }
            if tree.nodes.insert(node.id, node).is_some() {
                return Err("duplicate node id in snapshot".to_string());
            }
        }

        let nodes: Vec<Node> = tree.nodes.values().cloned().collect();
        for node in nodes {
            if let Some(parent_id) = node.parent_id {
                match tree.nodes.get(&parent_id) {
                    Some(parent) if parent.workspace_id == node.workspace_id => {}
                    _ => return Err(format!("node {} has a dangling parent", node.id)),
                }
            }
            tree.index(&node).map_err(|e| e.to_string())?;
        }

        Ok(tree)
    }
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Child of `parent` stored under `key` (a literal or the param sentinel).
    pub fn child(
        &self,
        workspace_id: WorkspaceId,
        parent_id: Option<NodeId>,
        key: &str,
    ) -> Option<&Node> {
        self.siblings
            .get(&(workspace_id, parent_id))
            .and_then(|children| children.get(key))
            .and_then(|id| self.nodes.get(id))
    }

    /// Children of `parent` ordered by stored segment.
    pub fn children(
        &self,
        workspace_id: WorkspaceId,
        parent_id: Option<NodeId>,
    ) -> impl Iterator<Item = &Node> {
        self.siblings
            .get(&(workspace_id, parent_id))
            .into_iter()
            .flat_map(|children| children.values())
            .filter_map(|id| self.nodes.get(id))
    }

    /// Return the sibling under `parent` matching `spec`, creating it if absent.
    pub fn get_or_create(
        &mut self,
        parent_id: Option<NodeId>,
        spec: &SegmentSpec,
        workspace_id: WorkspaceId,
    ) -> Result<NodeId, MockError> {
        if let Some(existing) = self.child(workspace_id, parent_id, spec.key()) {
            return Ok(existing.id);
        }

        if let Some(parent_id) = parent_id {
            match self.nodes.get(&parent_id) {
                Some(parent) if parent.workspace_id == workspace_id => {}
                _ => {
                    return Err(MockError::not_found(format!(
                        "parent node {parent_id} in workspace {workspace_id}"
                    )))
                }
            }
        }

        self.next_id += 1;
        let node = Node::from_spec(NodeId(self.next_id), parent_id, spec, workspace_id);
        let id = node.id;
        self.insert(node)?;
        Ok(id)
    }

    /// Insert a fully formed node, enforcing sibling uniqueness.
    pub fn insert(&mut self, node: Node) -> Result<(), MockError> {
        if self.nodes.contains_key(&node.id) {
            return Err(MockError::conflict(format!("node {} already exists", node.id)));
        }
        self.index(&node)?;
        self.next_id = self.next_id.max(node.id.0);
        self.nodes.insert(node.id, node);
        Ok(())
    }

    fn index(&mut self, node: &Node) -> Result<(), MockError> {
        let children = self
            .siblings
            .entry((node.workspace_id, node.parent_id))
            .or_default();
        if children.contains_key(&node.segment) {
            return Err(MockError::conflict(format!(
                "UNIQUE constraint failed: segment {} already exists under this parent",
                node.segment
            )));
        }
        children.insert(node.segment.clone(), node.id);
        Ok(())
    }

    /// Flag a node as answering requests directly. Returns true on the first flip.
    pub fn mark_direct(&mut self, id: NodeId) -> Result<bool, MockError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| MockError::not_found(format!("node {id}")))?;
        let flipped = !node.has_direct_responses;
        node.has_direct_responses = true;
        Ok(flipped)
    }

    /// Nodes from the root down to `id` (inclusive).
    pub fn ancestor_chain(&self, id: NodeId) -> Result<Vec<&Node>, MockError> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);

        while let Some(current) = cursor {
            if chain.len() > self.nodes.len() {
                return Err(MockError::Storage(anyhow::anyhow!(
                    "cycle detected while ascending from node {id}"
                )));
            }
            let node = self
                .nodes
                .get(&current)
                .ok_or_else(|| MockError::not_found(format!("node {current}")))?;
            chain.push(node);
            cursor = node.parent_id;
        }

        chain.reverse();
        Ok(chain)
    }
}

/// Render a root-to-leaf chain back into a pattern such as `/items/:id`.
pub fn render_template(chain: &[&Node]) -> String {
    chain.iter().map(|node| node.template_segment()).collect()
}

/// Parameter names along a root-to-leaf chain, in order.
pub fn param_names(chain: &[&Node]) -> Vec<String> {
    chain
        .iter()
        .filter_map(|node| node.param_name.clone())
        .collect()
}
