//! # Bounded Trust Traversal
//!
//! Depth-first walk over positive-weight trust relations, starting from one
//! identity with a depth budget. Each visited identity is fetched exactly
//! once per traversal.
//!
//! ## Budget rules
//!
//! - budget `< 0`: nothing is visited
//! - budget `== 0`: node added as partial, relations not followed
//! - budget `> 0`: node added complete, each positive relation becomes an
//!   edge and its target is visited with `budget - 1`
//!
//! The edge is added before its target is visited, so edges may point at
//! identities that were already visited, were never fetched, or have no
//! record.
//!
//! The walk uses an explicit frame stack instead of recursion. Targets are
//! visited in the same preorder a recursive walk would produce, so which
//! budget an identity first receives (and therefore whether it ends up
//! partial) is the same.

use shared_types::{Identity, UserRecord};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::{TrustGraph, TrustGraphError, TrustNode, VisitedSet};
use crate::ports::{NodeObserver, UserFetcher};

/// A node whose positive relations are still being walked.
struct Frame {
    source: Identity,
    child_budget: i32,
    pending: std::vec::IntoIter<Identity>,
}

/// Traversal over a record source, optionally reporting every added node.
pub struct TrustGraphBuilder<'a, F: UserFetcher + ?Sized> {
    fetcher: &'a F,
    observer: Option<&'a dyn NodeObserver>,
}

impl<'a, F: UserFetcher + ?Sized> TrustGraphBuilder<'a, F> {
    /// Builder over `fetcher`.
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            observer: None,
        }
    }

    /// Report every added node to `observer`.
    pub fn with_observer(mut self, observer: &'a dyn NodeObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Traverse from `start` with a fresh visited set.
    pub async fn traverse(
        &self,
        start: &Identity,
        depth_budget: i32,
        is_main_node: bool,
    ) -> Result<TrustGraph, TrustGraphError> {
        let mut visited = VisitedSet::new();
        self.traverse_with(start, depth_budget, is_main_node, &mut visited)
            .await
    }

    /// Traverse from `start`, skipping identities already in `visited`.
    ///
    /// A fetch failure on `start` is returned. A failure further out aborts
    /// only that branch; the snapshot keeps everything gathered before it.
    pub async fn traverse_with(
        &self,
        start: &Identity,
        depth_budget: i32,
        is_main_node: bool,
        visited: &mut VisitedSet,
    ) -> Result<TrustGraph, TrustGraphError> {
        let mut graph = TrustGraph::new();
        let mut stack = Vec::new();

        if let Some(frame) = self
            .visit(&mut graph, visited, start, depth_budget, is_main_node)
            .await?
        {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(target) = frame.pending.next() else {
                stack.pop();
                continue;
            };
            let source = frame.source.clone();
            let budget = frame.child_budget;

            graph.insert_edge(source.clone(), target.clone());

            match self.visit(&mut graph, visited, &target, budget, false).await {
                Ok(Some(child)) => stack.push(child),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        source = %source,
                        target = %target,
                        "[lot-02] Branch aborted: {}", e
                    );
                }
            }
        }

        debug!(
            "[lot-02] Traversal from {} gathered {} nodes, {} edges",
            start,
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph)
    }

    /// Visit one identity. Returns the frame of relations to walk next.
    async fn visit(
        &self,
        graph: &mut TrustGraph,
        visited: &mut VisitedSet,
        id: &Identity,
        budget: i32,
        is_main_node: bool,
    ) -> Result<Option<Frame>, TrustGraphError> {
        if budget < 0 || !visited.insert(id) {
            return Ok(None);
        }

        let Some(record) = self.fetcher.fetch_user(id).await? else {
            debug!("[lot-02] No record for {}", id);
            return Ok(None);
        };

        let partial = budget == 0;
        graph.insert_node(TrustNode {
            id: id.clone(),
            profile: record.profile.clone(),
            is_main_node,
            is_selected: false,
            partial,
        });

        if let Some(observer) = self.observer {
            observer.on_node_fetched(id, &record, !partial);
        }

        if partial {
            return Ok(None);
        }

        Ok(Some(Frame {
            source: id.clone(),
            child_budget: budget - 1,
            pending: record.trusted_targets().cloned().collect::<Vec<_>>().into_iter(),
        }))
    }
}

/// Fetch several records, skipping identities that fail or have none.
pub async fn fetch_many<F: UserFetcher + ?Sized>(
    fetcher: &F,
    ids: &[Identity],
) -> BTreeMap<Identity, UserRecord> {
    let mut records = BTreeMap::new();
    for id in ids {
        match fetcher.fetch_user(id).await {
            Ok(Some(record)) => {
                records.insert(id.clone(), record);
            }
            Ok(None) => {}
            Err(e) => warn!("[lot-02] Skipping {}: {}", id, e),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{invariant_edge_sources_present, invariant_frontier_has_no_edges};
    use crate::ports::MockUserFetcher;
    use parking_lot::Mutex;
    use shared_types::TokenAmount;

    fn id(s: &str) -> Identity {
        Identity::new(s)
    }

    fn user(name: &str, relations: &[(&str, f32)]) -> UserRecord {
        relations.iter().fold(
            UserRecord::new(name, TokenAmount::zero(), format!("{} profile", name)),
            |record, (target, weight)| record.with_relation(*target, *weight),
        )
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(Identity, bool)>>,
    }

    impl NodeObserver for Recorder {
        fn on_node_fetched(&self, id: &Identity, _record: &UserRecord, fully_expanded: bool) {
            self.seen.lock().push((id.clone(), fully_expanded));
        }
    }

    #[tokio::test]
    async fn test_weight_filter() {
        let fetcher = MockUserFetcher::with_records([
            user("a", &[("b", 0.5), ("c", 0.0), ("d", -1.0)]),
            user("b", &[]),
            user("c", &[]),
            user("d", &[]),
        ]);

        let graph = TrustGraphBuilder::new(&fetcher)
            .traverse(&id("a"), 1, true)
            .await
            .unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge(&id("a"), &id("b")));
        assert_eq!(graph.node_count(), 2);
        assert!(graph.node(&id("c")).is_none());
        assert!(graph.node(&id("a")).unwrap().is_main_node);
        assert!(!graph.node(&id("b")).unwrap().is_main_node);
    }

    #[tokio::test]
    async fn test_depth_zero_gives_single_partial_node() {
        let fetcher = MockUserFetcher::with_records([user("a", &[("b", 1.0)]), user("b", &[])]);

        let graph = TrustGraphBuilder::new(&fetcher)
            .traverse(&id("a"), 0, true)
            .await
            .unwrap();

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.node(&id("a")).unwrap().partial);
        assert_eq!(fetcher.fetched(), vec![id("a")]);
    }

    #[tokio::test]
    async fn test_negative_budget_visits_nothing() {
        let fetcher = MockUserFetcher::with_records([user("a", &[])]);
        let graph = TrustGraphBuilder::new(&fetcher)
            .traverse(&id("a"), -1, true)
            .await
            .unwrap();
        assert!(graph.is_empty());
        assert!(fetcher.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_cycle_fetches_each_identity_once() {
        let fetcher = MockUserFetcher::with_records([
            user("a", &[("b", 1.0)]),
            user("b", &[("a", 1.0)]),
        ]);

        let graph = TrustGraphBuilder::new(&fetcher)
            .traverse(&id("a"), 5, true)
            .await
            .unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains_edge(&id("b"), &id("a")));
        assert_eq!(fetcher.fetched(), vec![id("a"), id("b")]);
    }

    #[tokio::test]
    async fn test_absent_target_keeps_edge_without_node() {
        let fetcher = MockUserFetcher::with_records([user("a", &[("ghost", 1.0)])]);

        let graph = TrustGraphBuilder::new(&fetcher)
            .traverse(&id("a"), 2, true)
            .await
            .unwrap();

        assert!(graph.contains_edge(&id("a"), &id("ghost")));
        assert!(graph.node(&id("ghost")).is_none());
        assert!(invariant_edge_sources_present(&graph));
    }

    #[tokio::test]
    async fn test_absent_start_gives_empty_graph() {
        let fetcher = MockUserFetcher::default();
        let graph = TrustGraphBuilder::new(&fetcher)
            .traverse(&id("nobody"), 2, true)
            .await
            .unwrap();
        assert!(graph.is_empty());
    }

    #[tokio::test]
    async fn test_start_failure_is_returned() {
        let fetcher = MockUserFetcher::with_records([user("a", &[])]).fail_on("a");
        let result = TrustGraphBuilder::new(&fetcher)
            .traverse(&id("a"), 2, true)
            .await;
        assert!(matches!(result, Err(TrustGraphError::FetchFailure { .. })));
    }

    #[tokio::test]
    async fn test_branch_failure_keeps_partial_results() {
        let fetcher = MockUserFetcher::with_records([
            user("a", &[("b", 1.0), ("c", 1.0)]),
            user("b", &[("x", 1.0)]),
            user("c", &[]),
        ])
        .fail_on("b");

        let graph = TrustGraphBuilder::new(&fetcher)
            .traverse(&id("a"), 2, true)
            .await
            .unwrap();

        assert!(graph.node(&id("b")).is_none());
        assert!(graph.node(&id("c")).is_some());
        assert!(graph.contains_edge(&id("a"), &id("b")));
        assert!(!graph.contains_edge(&id("b"), &id("x")));
    }

    #[tokio::test]
    async fn test_first_visit_decides_budget() {
        // a -> b -> c and a -> c: c is reached through b first with budget 0.
        let fetcher = MockUserFetcher::with_records([
            user("a", &[("b", 1.0), ("c", 1.0)]),
            user("b", &[("c", 1.0)]),
            user("c", &[("d", 1.0)]),
            user("d", &[]),
        ]);

        let graph = TrustGraphBuilder::new(&fetcher)
            .traverse(&id("a"), 2, true)
            .await
            .unwrap();

        assert!(graph.node(&id("c")).unwrap().partial);
        assert!(graph.node(&id("d")).is_none());
        assert!(graph.contains_edge(&id("a"), &id("c")));
        assert!(graph.contains_edge(&id("b"), &id("c")));
        assert_eq!(fetcher.fetched(), vec![id("a"), id("b"), id("c")]);
        assert!(invariant_frontier_has_no_edges(&graph));
    }

    #[tokio::test]
    async fn test_observer_called_once_per_node() {
        let fetcher = MockUserFetcher::with_records([
            user("a", &[("b", 1.0)]),
            user("b", &[("a", 1.0)]),
        ]);
        let recorder = Recorder::default();

        TrustGraphBuilder::new(&fetcher)
            .with_observer(&recorder)
            .traverse(&id("a"), 1, true)
            .await
            .unwrap();

        assert_eq!(
            *recorder.seen.lock(),
            vec![(id("a"), true), (id("b"), false)]
        );
    }

    #[tokio::test]
    async fn test_shared_visited_set_skips_known() {
        let fetcher = MockUserFetcher::with_records([user("a", &[("b", 1.0)]), user("b", &[])]);
        let mut visited = VisitedSet::new();
        visited.insert(&id("b"));

        let graph = TrustGraphBuilder::new(&fetcher)
            .traverse_with(&id("a"), 2, true, &mut visited)
            .await
            .unwrap();

        assert!(graph.node(&id("b")).is_none());
        assert!(graph.contains_edge(&id("a"), &id("b")));
        assert_eq!(visited.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_many_skips_missing_and_failed() {
        let fetcher = MockUserFetcher::with_records([user("a", &[]), user("b", &[])]).fail_on("b");
        let records = fetch_many(&fetcher, &[id("a"), id("b"), id("c")]).await;
        assert_eq!(records.keys().collect::<Vec<_>>(), vec![&id("a")]);
    }
}
