//! Request handlers, grouped by resource.

pub mod mocks;
pub mod replay;
pub mod system;
pub mod workspaces;

use crate::error::MockError;

/// Run a store write off the async executor; writes may touch the disk.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, MockError>
where
    F: FnOnce() -> Result<T, MockError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| MockError::Storage(anyhow::anyhow!("write task failed: {e}")))?
}
