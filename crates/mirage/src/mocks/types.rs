//! Request and listing types for mock management.

use crate::binding::{BindingId, ParamBindingsInput};
use crate::tree::NodeId;
use serde::{Deserialize, Serialize};

/// Body of a mock registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMock {
    pub path: String,
    pub method: String,
    /// Kept wide so out-of-range values are reported, not truncated.
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

/// Body of a parameter-specific override for an existing mock.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOverride {
    pub method: String,
    #[serde(default)]
    pub path_params: Option<ParamBindingsInput>,
    pub status: i64,
    #[serde(default)]
    pub response: Option<String>,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Registered {
    pub binding_id: BindingId,
    /// Leaf reference used to address overrides for this mock.
    pub leaf_id: NodeId,
}

/// One generic mock as shown by the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockSummary {
    pub response_id: BindingId,
    pub full_path: String,
    pub param_names: Vec<String>,
    pub method: String,
    pub response_body: Option<String>,
    pub status: u16,
    pub direct_path_id: NodeId,
}
