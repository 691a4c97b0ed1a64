//! # Domain Entities
//!
//! Trust nodes, edges, graph snapshots and the per-traversal visited set.
//!
//! A node's children are not stored: they are derived from the edge set by
//! source, so children and edges cannot diverge.

use serde::{Deserialize, Serialize};
use shared_types::Identity;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A participant as seen by one traversal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustNode {
    /// Identity of the participant.
    pub id: Identity,
    /// Public profile text.
    pub profile: String,
    /// Node the exploration started from.
    pub is_main_node: bool,
    /// Node currently selected by the user.
    pub is_selected: bool,
    /// Outward relations not explored (frontier node).
    pub partial: bool,
}

impl TrustNode {
    /// Create an unselected node.
    pub fn new(id: impl Into<Identity>, profile: impl Into<String>, partial: bool) -> Self {
        Self {
            id: id.into(),
            profile: profile.into(),
            is_main_node: false,
            is_selected: false,
            partial,
        }
    }
}

/// Directed, unweighted trust edge.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrustEdge {
    /// Trusting identity.
    pub source: Identity,
    /// Trusted identity (may not be fetched yet).
    pub target: Identity,
}

impl TrustEdge {
    /// Create an edge.
    pub fn new(source: impl Into<Identity>, target: impl Into<Identity>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Nodes keyed by identity plus a duplicate-free edge set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustGraph {
    /// Nodes keyed by identity.
    pub nodes: BTreeMap<Identity, TrustNode>,
    /// Edges ordered by `(source, target)`.
    pub edges: BTreeSet<TrustEdge>,
}

impl TrustGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node.
    pub fn insert_node(&mut self, node: TrustNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Insert an edge. Returns `false` if it was already present.
    pub fn insert_edge(&mut self, source: Identity, target: Identity) -> bool {
        self.edges.insert(TrustEdge { source, target })
    }

    /// Node by identity.
    pub fn node(&self, id: &Identity) -> Option<&TrustNode> {
        self.nodes.get(id)
    }

    /// Whether `(source, target)` is an edge.
    pub fn contains_edge(&self, source: &Identity, target: &Identity) -> bool {
        self.edges.contains(&TrustEdge {
            source: source.clone(),
            target: target.clone(),
        })
    }

    /// Targets of `id`'s outgoing edges, ordered by identity.
    pub fn children(&self, id: &Identity) -> Vec<&Identity> {
        // The empty identity sorts before every other one.
        let from = TrustEdge {
            source: id.clone(),
            target: Identity::new(""),
        };
        self.edges
            .range(from..)
            .take_while(|edge| &edge.source == id)
            .map(|edge| &edge.target)
            .collect()
    }

    /// Node count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edge count.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if the graph has no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Identities of selected nodes.
    pub fn selected(&self) -> impl Iterator<Item = &Identity> + '_ {
        self.nodes
            .values()
            .filter(|node| node.is_selected)
            .map(|node| &node.id)
    }
}

/// Identities already visited by one traversal (the cycle guard).
#[derive(Clone, Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<Identity>,
}

impl VisitedSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` visited. Returns `false` if it already was.
    pub fn insert(&mut self, id: &Identity) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.clone())
    }

    /// Whether `id` was visited.
    pub fn contains(&self, id: &Identity) -> bool {
        self.seen.contains(id)
    }

    /// Number of visited identities.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True if nothing was visited.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
