//! Storage and workspace configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Path value selecting the in-memory backend explicitly.
pub const IN_MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Snapshot file. Absent or `:memory:` keeps everything in memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl StorageConfig {
    /// File to persist to, if storage is durable.
    pub fn durable_path(&self) -> Option<PathBuf> {
        match self.path.as_deref() {
            None | Some(IN_MEMORY_PATH) => None,
            Some(path) => Some(PathBuf::from(path)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkspacesConfig {
    /// Serve every workspace under its own prefix instead of the default one.
    #[serde(default)]
    pub enabled: bool,
}
