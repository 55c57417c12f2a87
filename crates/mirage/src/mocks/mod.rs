//! Mock management: registration, overrides and listing.
//!
//! # Module Structure
//!
//! - `types` - Request bodies and listing rows
//! - `registration` - Generic mock and override registration against a working state
//! - `listing` - Read-only listing of generic mocks per workspace
//! - `manager` - `MockManager`, which wraps the above in store transactions

mod listing;
mod manager;
mod registration;
mod types;

pub use manager::MockManager;
pub use types::{MockSummary, NewMock, NewOverride, Registered};
