//! # Incremental Merge
//!
//! Folds a fresh traversal snapshot into the accumulated graph.
//!
//! ## Rules
//!
//! Nodes:
//! - only in `incoming`: taken as is
//! - only in `base`: kept unchanged
//! - in both: profile and main flag from `incoming`, `partial` only if both
//!   were partial, selected if `incoming` says so or it is the selected id
//!
//! Edges:
//! - every incoming edge is kept
//! - a base edge missing from `incoming` is dropped only if its source was
//!   fully expanded by the incoming traversal (the relation was retracted);
//!   if the source is absent from `incoming` or partial there, the edge stays
//!
//! Children are derived from edges, so the children of a node present only
//! in `base` are preserved by the edge rule.

use shared_types::Identity;
use std::collections::btree_map::Entry;
use tracing::debug;

use crate::domain::TrustGraph;

/// Merge `incoming` into `base`. `base == None` returns `incoming` with the
/// selected flag applied.
pub fn merge(base: Option<TrustGraph>, incoming: TrustGraph, selected: Option<&Identity>) -> TrustGraph {
    let Some(base) = base else {
        let mut graph = incoming;
        if let Some(node) = selected.and_then(|id| graph.nodes.get_mut(id)) {
            node.is_selected = true;
        }
        return graph;
    };

    let TrustGraph {
        mut nodes,
        edges: base_edges,
    } = base;
    let TrustGraph {
        nodes: incoming_nodes,
        mut edges,
    } = incoming;

    let mut retracted = 0usize;
    for edge in base_edges {
        if edges.contains(&edge) {
            continue;
        }
        let expanded = incoming_nodes
            .get(&edge.source)
            .is_some_and(|node| !node.partial);
        if expanded {
            retracted += 1;
        } else {
            edges.insert(edge);
        }
    }

    for (id, fresh) in incoming_nodes {
        let is_selected_id = selected == Some(&id);
        match nodes.entry(id) {
            Entry::Occupied(mut slot) => {
                let node = slot.get_mut();
                node.profile = fresh.profile;
                node.is_main_node = fresh.is_main_node;
                node.partial = node.partial && fresh.partial;
                node.is_selected = fresh.is_selected || is_selected_id;
            }
            Entry::Vacant(slot) => {
                let mut node = fresh;
                node.is_selected = node.is_selected || is_selected_id;
                slot.insert(node);
            }
        }
    }

    if retracted > 0 {
        debug!("[lot-02] Merge retracted {} edges", retracted);
    }

    TrustGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{invariant_partial_monotonic, TrustNode};

    fn id(s: &str) -> Identity {
        Identity::new(s)
    }

    fn graph(nodes: &[(&str, bool)], edges: &[(&str, &str)]) -> TrustGraph {
        let mut graph = TrustGraph::new();
        for (name, partial) in nodes {
            graph.insert_node(TrustNode::new(*name, format!("{} profile", name), *partial));
        }
        for (source, target) in edges {
            graph.insert_edge(id(source), id(target));
        }
        graph
    }

    #[test]
    fn test_no_base_applies_selection() {
        let incoming = graph(&[("a", false)], &[]);
        let merged = merge(None, incoming, Some(&id("a")));
        assert!(merged.node(&id("a")).unwrap().is_selected);
    }

    #[test]
    fn test_selection_of_unknown_id_ignored() {
        let incoming = graph(&[("a", false)], &[]);
        let merged = merge(None, incoming.clone(), Some(&id("zzz")));
        assert_eq!(merged, incoming);
    }

    #[test]
    fn test_idempotent() {
        let g = graph(&[("a", false), ("b", true)], &[("a", "b")]);
        let h = graph(&[("a", false), ("c", true)], &[("a", "c")]);

        let once = merge(Some(g), h.clone(), None);
        let twice = merge(Some(once.clone()), h, None);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_edge_retraction() {
        let g = graph(&[("a", false), ("b", true)], &[("a", "b")]);
        let h = graph(&[("a", false)], &[]);

        let merged = merge(Some(g), h, None);
        assert!(!merged.contains_edge(&id("a"), &id("b")));
        assert!(merged.node(&id("b")).is_some());
    }

    #[test]
    fn test_partial_source_keeps_edges() {
        let g = graph(&[("x", false), ("y", true)], &[("x", "y")]);
        let h = graph(&[("x", true)], &[]);

        let merged = merge(Some(g.clone()), h, None);
        assert!(merged.contains_edge(&id("x"), &id("y")));
        assert!(!merged.node(&id("x")).unwrap().partial);
        assert!(invariant_partial_monotonic(&g, &merged));
    }

    #[test]
    fn test_children_preserved_for_base_only_nodes() {
        let g = graph(&[("x", false), ("y", true), ("z", true)], &[("x", "y"), ("x", "z")]);
        let h = graph(&[("q", false)], &[]);

        let merged = merge(Some(g), h, None);
        assert_eq!(merged.children(&id("x")), vec![&id("y"), &id("z")]);
        assert!(merged.node(&id("q")).is_some());
    }

    #[test]
    fn test_partial_clears_once_expanded() {
        let g = graph(&[("a", true)], &[]);
        let h = graph(&[("a", false)], &[]);
        let merged = merge(Some(g), h, None);
        assert!(!merged.node(&id("a")).unwrap().partial);
    }

    #[test]
    fn test_overlap_takes_fresh_profile_and_main_flag() {
        let mut g = graph(&[("a", false)], &[]);
        g.nodes.get_mut(&id("a")).unwrap().is_main_node = true;
        let mut h = TrustGraph::new();
        h.insert_node(TrustNode::new("a", "updated", true));

        let merged = merge(Some(g), h, Some(&id("a")));
        let node = merged.node(&id("a")).unwrap();
        assert_eq!(node.profile, "updated");
        assert!(!node.is_main_node);
        assert!(node.is_selected);
    }

    #[test]
    fn test_base_only_node_unchanged_by_selection() {
        let g = graph(&[("a", false)], &[]);
        let h = graph(&[("b", false)], &[]);
        let merged = merge(Some(g), h, Some(&id("a")));
        assert!(!merged.node(&id("a")).unwrap().is_selected);
    }
}
