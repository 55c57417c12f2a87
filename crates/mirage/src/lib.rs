//! Mirage - mock HTTP server with a shared route-pattern tree.
//!
//! Mocks are registered as a path pattern (`/orders/:orderId`), a method, a
//! status and an optional body. Incoming requests are matched against every
//! registered pattern; an override bound to exact parameter values beats the
//! generic response for its pattern.
//!
//! # Module Structure
//!
//! - `tree` - Pattern tree arena with shared prefixes
//! - `binding` - Responses attached to tree leaves
//! - `workspace` - Tenant scopes and paging
//! - `store` / `backends` - Snapshot store with transactional writes and persistence
//! - `mocks` - Registration, overrides and listing
//! - `dispatch` - Matching concrete requests to responses
//! - `admin_api` - HTTP server, management API and replay endpoint
//! - `config` / `metrics` - Configuration and Prometheus metrics

// ===== Core model =====
pub mod binding;
pub mod error;
pub mod tree;
pub mod workspace;

// ===== Storage =====
pub mod backends;
pub mod store;

// ===== Operations =====
pub mod dispatch;
pub mod mocks;

// ===== Serving =====
pub mod admin_api;
pub mod config;
pub mod metrics;

pub use admin_api::{AppState, MirageServer};
pub use dispatch::{Dispatcher, MockResponse};
pub use error::MockError;
pub use mocks::{MockManager, MockSummary, NewMock, NewOverride, Registered};
pub use store::MockStore;
pub use workspace::{WorkspaceId, DEFAULT_WORKSPACE_ID};
