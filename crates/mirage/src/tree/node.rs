//! Tree node: one path segment position, shared by every pattern with the
//! same prefix.

use super::segment::{SegmentSpec, PARAM_SENTINEL};
use crate::workspace::WorkspaceId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    /// Literal segment (`/orders`) or [`PARAM_SENTINEL`] for parameters.
    pub segment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    pub is_param: bool,
    /// Present iff `is_param`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_name: Option<String>,
    #[serde(default)]
    pub has_direct_responses: bool,
    pub workspace_id: WorkspaceId,
}

impl Node {
    pub(crate) fn from_spec(
        id: NodeId,
        parent_id: Option<NodeId>,
        spec: &SegmentSpec,
        workspace_id: WorkspaceId,
    ) -> Self {
        Self {
            id,
            segment: spec.key().to_string(),
            parent_id,
            is_param: spec.is_param(),
            param_name: spec.param_name().map(str::to_string),
            has_direct_responses: false,
            workspace_id,
        }
    }

    /// Segment as written in a pattern: `:name` for parameters.
    pub fn template_segment(&self) -> String {
        match (&self.is_param, &self.param_name) {
            (true, Some(name)) => format!("/:{name}"),
            _ => self.segment.clone(),
        }
    }

    /// `is_param` agrees with both the sentinel and the presence of a name.
    pub(crate) fn is_consistent(&self) -> bool {
        if self.is_param {
            self.segment == PARAM_SENTINEL && self.param_name.is_some()
        } else {
            self.segment != PARAM_SENTINEL && self.param_name.is_none()
        }
    }
}
