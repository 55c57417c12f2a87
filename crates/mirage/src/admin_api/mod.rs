//! HTTP surface for mirage.
//!
//! One listener serves:
//! - Mock registration, overrides and listing under `/api`
//! - Workspace creation and paging (when workspaces are enabled)
//! - Replay of registered mocks under `/sarab`
//! - Health and metrics endpoints

mod handlers;
mod router;
mod server;
mod types;

pub use router::DISPATCH_PREFIX;
pub use server::{AppState, MirageServer};
pub use types::ErrorResponse;
