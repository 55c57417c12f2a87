use super::StateBackend;
use crate::store::StoreState;
use anyhow::Result;

/// Backend that keeps nothing beyond the live snapshot.
///
/// Useful for tests, development, and ephemeral deployments.
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryBackend;

impl StateBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "inmemory"
    }

    fn load(&self) -> Result<Option<StoreState>> {
        Ok(None)
    }

    fn persist(&self, _state: &StoreState) -> Result<()> {
        Ok(())
    }
}
