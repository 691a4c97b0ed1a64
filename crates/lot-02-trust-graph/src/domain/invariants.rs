//! # Domain Invariants
//!
//! Rules every snapshot and every accumulated graph must satisfy.

use super::entities::TrustGraph;

/// Default exploration depth.
pub const DEFAULT_DEPTH: i32 = 2;

/// Invariant: every edge starts at a node that some traversal visited.
///
/// Targets may reference identities that were never fetched.
pub fn invariant_edge_sources_present(graph: &TrustGraph) -> bool {
    graph
        .edges
        .iter()
        .all(|edge| graph.nodes.contains_key(&edge.source))
}

/// Invariant: a partial node has no outgoing edges of its own.
///
/// Holds for traversal snapshots; merged graphs may keep edges of nodes that
/// an earlier fetch expanded.
pub fn invariant_frontier_has_no_edges(graph: &TrustGraph) -> bool {
    graph
        .nodes
        .values()
        .filter(|node| node.partial)
        .all(|node| graph.children(&node.id).is_empty())
}

/// Invariant: once fully expanded, a node never reverts to partial.
pub fn invariant_partial_monotonic(before: &TrustGraph, after: &TrustGraph) -> bool {
    before
        .nodes
        .values()
        .filter(|node| !node.partial)
        .all(|node| after.nodes.get(&node.id).is_some_and(|n| !n.partial))
}
