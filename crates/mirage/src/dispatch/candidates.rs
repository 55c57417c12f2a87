//! Candidate chain enumeration for a concrete request path.

use crate::tree::{NodeId, RouteTree, PARAM_SENTINEL};
use crate::workspace::WorkspaceId;

/// A root-to-leaf chain consistent with the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateChain {
    pub leaf: NodeId,
    pub param_segments: usize,
}

/// Every chain in `workspace_id` whose segments match `segments` one for one.
///
/// At each depth the literal child is explored before the parameter child,
/// then chains are stably sorted by their number of parameter segments. The
/// result is ordered by fewest parameters, ties going to the chain that
/// stays literal longest.
pub fn candidate_chains(
    tree: &RouteTree,
    workspace_id: WorkspaceId,
    segments: &[String],
) -> Vec<CandidateChain> {
    let mut chains = Vec::new();
    descend(tree, workspace_id, segments, None, 0, &mut chains);
    chains.sort_by_key(|chain| chain.param_segments);
    chains
}

fn descend(
    tree: &RouteTree,
    workspace_id: WorkspaceId,
    segments: &[String],
    parent: Option<NodeId>,
    params: usize,
    out: &mut Vec<CandidateChain>,
) {
    let Some((segment, rest)) = segments.split_first() else {
        if let Some(leaf) = parent {
            out.push(CandidateChain {
                leaf,
                param_segments: params,
            });
        }
        return;
    };

    // A request segment spelled like the sentinel is still just a value
    if segment != PARAM_SENTINEL {
        if let Some(literal) = tree.child(workspace_id, parent, segment) {
            descend(tree, workspace_id, rest, Some(literal.id), params, out);
        }
    }
    if let Some(param) = tree.child(workspace_id, parent, PARAM_SENTINEL) {
        descend(tree, workspace_id, rest, Some(param.id), params + 1, out);
    }
}
