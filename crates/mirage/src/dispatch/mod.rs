//! Dispatch engine: match a concrete request against registered patterns.
//!
//! # Module Structure
//!
//! - `candidates` - Backtracking walk producing every chain consistent with the path
//! - `resolve` (here) - Specific-before-generic selection over those chains
//!
//! Lookups read a store snapshot and never take the writer lock.

mod candidates;

pub use candidates::{candidate_chains, CandidateChain};

use crate::binding::{HttpMethod, ParamBindings, ResponseBinding};
use crate::error::MockError;
use crate::metrics;
use crate::store::{MockStore, StoreState};
use crate::tree::{split_path, NodeId, RouteTree};
use crate::workspace::WorkspaceId;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Response replayed for a matched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Specific,
    Generic,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Specific => "specific",
            MatchKind::Generic => "generic",
        }
    }
}

/// The binding chosen for a request.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub binding: &'a ResponseBinding,
    pub kind: MatchKind,
}

/// Render the leaf's chain with every parameter replaced by its override
/// value. `None` if a parameter has no value.
fn substitute(
    tree: &RouteTree,
    leaf: NodeId,
    params: &ParamBindings,
) -> Result<Option<String>, MockError> {
    let mut rendered = String::new();
    for node in tree.ancestor_chain(leaf)? {
        match &node.param_name {
            Some(name) => match params.get(name) {
                Some(value) => {
                    rendered.push('/');
                    rendered.push_str(value);
                }
                None => return Ok(None),
            },
            None => rendered.push_str(&node.segment),
        }
    }
    Ok(Some(rendered))
}

/// Pick the binding that answers `method` on `path` in `workspace_id`.
///
/// Specific overrides are tried first, across all candidate chains in rank
/// order; the first whose substituted pattern equals the canonical request
/// path wins. Otherwise the first generic binding in rank order is used.
pub fn resolve<'a>(
    state: &'a StoreState,
    workspace_id: WorkspaceId,
    path: &str,
    method: HttpMethod,
) -> Result<Option<Resolved<'a>>, MockError> {
    let segments = split_path(path);
    let leaves: Vec<NodeId> = candidate_chains(&state.tree, workspace_id, &segments)
        .into_iter()
        .map(|chain| chain.leaf)
        .collect();
    if leaves.is_empty() {
        return Ok(None);
    }

    let concrete = segments.concat();
    for binding in state.bindings.find_candidates(&leaves, method) {
        match &binding.param_bindings {
            Some(params) => {
                if substitute(&state.tree, binding.node_id, params)?.as_deref()
                    == Some(concrete.as_str())
                {
                    return Ok(Some(Resolved {
                        binding,
                        kind: MatchKind::Specific,
                    }));
                }
            }
            // Generics sort after every specific candidate
            None => {
                return Ok(Some(Resolved {
                    binding,
                    kind: MatchKind::Generic,
                }))
            }
        }
    }
    Ok(None)
}

/// Read-only dispatcher over the shared store.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<MockStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<MockStore>) -> Self {
        Self { store }
    }

    /// Find the response for a request. No match is `NotFound`, as is a
    /// method outside the canonical set, since nothing can be bound to it.
    pub fn dispatch(
        &self,
        workspace_id: WorkspaceId,
        path: &str,
        method: &str,
    ) -> Result<MockResponse, MockError> {
        let started = Instant::now();
        let not_found = || {
            MockError::not_found(format!(
                "path [{path}] with http method [{method}] is not found"
            ))
        };

        let Ok(parsed) = method.parse::<HttpMethod>() else {
            metrics::record_dispatch(
                metrics::UNKNOWN_METHOD,
                "not_found",
                elapsed_ms(started),
            );
            return Err(not_found());
        };

        let snapshot = self.store.snapshot();
        let resolved = resolve(&snapshot, workspace_id, path, parsed)?;
        let outcome = resolved.map_or("not_found", |r| r.kind.as_str());
        metrics::record_dispatch(parsed.as_str(), outcome, elapsed_ms(started));

        match resolved {
            Some(Resolved { binding, kind }) => {
                debug!(
                    workspace = %workspace_id,
                    path,
                    method = parsed.as_str(),
                    binding = %binding.id,
                    kind = kind.as_str(),
                    "Dispatched request"
                );
                Ok(MockResponse {
                    status: binding.status,
                    body: binding.body.clone(),
                })
            }
            None => {
                debug!(workspace = %workspace_id, path, method, "No mock matched");
                Err(not_found())
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
