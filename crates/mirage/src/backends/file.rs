use super::StateBackend;
use crate::store::StoreState;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Backend that keeps a JSON snapshot on disk.
///
/// Each save writes a sibling temp file and renames it over the snapshot, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn load(&self) -> Result<Option<StoreState>> {
        if !self.path.exists() {
            debug!("Store file {:?} does not exist, starting fresh", self.path);
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("reading store file {}", self.path.display()))?;
        let state: StoreState = serde_json::from_str(&json)
            .with_context(|| format!("parsing store file {}", self.path.display()))?;

        info!(
            "Loaded {} nodes and {} bindings from {:?}",
            state.tree.len(),
            state.bindings.len(),
            self.path
        );
        Ok(Some(state))
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating store directory {}", parent.display()))?;
        }

        let json = serde_json::to_vec(state).context("serializing store snapshot")?;
        let temp = self.temp_path();
        fs::write(&temp, json)
            .with_context(|| format!("writing store snapshot {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .with_context(|| format!("replacing store file {}", self.path.display()))?;

        debug!("Persisted store snapshot to {:?}", self.path);
        Ok(())
    }
}
