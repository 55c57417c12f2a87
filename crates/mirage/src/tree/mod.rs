//! Pattern tree store.
//!
//! Registered path patterns are kept as a forest of segment nodes, one forest
//! per workspace. Patterns that share a prefix share the ancestor nodes.
//!
//! ## Module Structure
//!
//! - `segment`: splitting patterns and request paths into segments
//! - `node`: the `Node` row and its id
//! - `arena`: `RouteTree`, the id-indexed arena with sibling lookup

mod arena;
mod node;
mod segment;

pub use arena::{param_names, render_template, RouteTree};
pub use node::{Node, NodeId};
pub use segment::{
    canonical_path, is_valid_pattern, parse_pattern, segments_of, split_path, SegmentSpec,
    PARAM_SENTINEL, ROOT_SEGMENT,
};
