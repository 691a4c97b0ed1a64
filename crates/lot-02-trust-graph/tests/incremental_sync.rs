//! End-to-end exploration scenarios through `TrustGraphService`.

use async_trait::async_trait;
use lot_02_trust_graph::{
    MockUserFetcher, TrustGraphApi, TrustGraphConfig, TrustGraphError, TrustGraphService,
    UserFetcher,
};
use shared_types::{Identity, TokenAmount, UserRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

fn id(s: &str) -> Identity {
    Identity::new(s)
}

fn user(name: &str, relations: &[(&str, f32)]) -> UserRecord {
    relations.iter().fold(
        UserRecord::new(name, TokenAmount::zero(), format!("{} profile", name)),
        |record, (target, weight)| record.with_relation(*target, *weight),
    )
}

fn service(fetcher: MockUserFetcher) -> TrustGraphService<MockUserFetcher> {
    TrustGraphService::new(TrustGraphConfig::default(), Arc::new(fetcher))
}

/// Records can change between explorations.
#[derive(Default)]
struct MutableFetcher {
    records: Mutex<HashMap<Identity, UserRecord>>,
}

impl MutableFetcher {
    fn put(&self, record: UserRecord) {
        self.records.lock().unwrap().insert(record.id.clone(), record);
    }
}

#[async_trait]
impl UserFetcher for MutableFetcher {
    async fn fetch_user(&self, id: &Identity) -> Result<Option<UserRecord>, TrustGraphError> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }
}

/// Holds fetches of one identity until released.
struct GatedFetcher {
    inner: MockUserFetcher,
    gated: Identity,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl UserFetcher for GatedFetcher {
    async fn fetch_user(&self, id: &Identity) -> Result<Option<UserRecord>, TrustGraphError> {
        if id == &self.gated {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.fetch_user(id).await
    }
}

#[tokio::test]
async fn weight_filter_keeps_only_positive_relations() {
    let svc = service(MockUserFetcher::with_records([
        user("a", &[("b", 0.5), ("c", 0.0)]),
        user("b", &[]),
        user("c", &[]),
    ]));

    let graph = svc.explore(&id("a"), 1, true, None).await.unwrap();

    assert_eq!(graph.edge_count(), 1);
    assert!(graph.contains_edge(&id("a"), &id("b")));
    assert!(graph.node(&id("c")).is_none());
}

#[tokio::test]
async fn depth_zero_returns_single_partial_node() {
    let svc = service(MockUserFetcher::with_records([user("a", &[("b", 1.0)])]));

    let graph = svc.explore(&id("a"), 0, true, None).await.unwrap();

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.node(&id("a")).unwrap().partial);
}

#[tokio::test]
async fn cycle_terminates_with_both_edges() {
    let fetcher = Arc::new(MockUserFetcher::with_records([
        user("a", &[("b", 1.0)]),
        user("b", &[("a", 1.0)]),
    ]));
    let svc = TrustGraphService::new(TrustGraphConfig::default(), fetcher.clone());

    let graph = svc.explore(&id("a"), 10, true, None).await.unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(fetcher.fetched(), vec![id("a"), id("b")]);
}

#[tokio::test]
async fn repeated_exploration_is_idempotent() {
    let svc = service(MockUserFetcher::with_records([
        user("a", &[("b", 1.0), ("c", 1.0)]),
        user("b", &[("d", 1.0)]),
        user("c", &[]),
        user("d", &[]),
    ]));

    let first = svc.explore(&id("a"), 2, true, None).await.unwrap();
    let second = svc.explore(&id("a"), 2, true, None).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn retracted_trust_removes_edge_on_refetch() {
    let fetcher = Arc::new(MutableFetcher::default());
    fetcher.put(user("a", &[("b", 1.0)]));
    fetcher.put(user("b", &[]));
    let svc = TrustGraphService::new(TrustGraphConfig::default(), fetcher.clone());

    let before = svc.explore(&id("a"), 1, true, None).await.unwrap();
    assert!(before.contains_edge(&id("a"), &id("b")));

    fetcher.put(user("a", &[]));
    let after = svc.explore(&id("a"), 1, true, None).await.unwrap();

    assert!(!after.contains_edge(&id("a"), &id("b")));
    assert!(after.node(&id("b")).is_some());
}

#[tokio::test]
async fn exploring_elsewhere_preserves_children() {
    let svc = service(MockUserFetcher::with_records([
        user("x", &[("y", 1.0), ("z", 1.0)]),
        user("y", &[]),
        user("z", &[]),
        user("q", &[]),
    ]));

    svc.explore(&id("x"), 1, true, None).await.unwrap();
    let merged = svc.explore(&id("q"), 1, false, None).await.unwrap();

    assert_eq!(merged.children(&id("x")), vec![&id("y"), &id("z")]);
    assert_eq!(merged.node_count(), 4);
}

#[tokio::test]
async fn depth_zero_refetch_of_expanded_node_keeps_children() {
    let svc = service(MockUserFetcher::with_records([
        user("x", &[("y", 1.0), ("z", 1.0)]),
        user("y", &[]),
        user("z", &[]),
    ]));

    let expanded = svc.explore(&id("x"), 1, true, None).await.unwrap();
    assert_eq!(expanded.children(&id("x")), vec![&id("y"), &id("z")]);

    let refetched = svc.explore(&id("x"), 0, true, None).await.unwrap();

    assert_eq!(refetched.children(&id("x")), vec![&id("y"), &id("z")]);
    assert!(!refetched.node(&id("x")).unwrap().partial);
    assert_eq!(refetched.edge_count(), 2);
}

#[tokio::test]
async fn frontier_refetch_keeps_expanded_edges() {
    let svc = service(MockUserFetcher::with_records([
        user("x", &[("y", 1.0)]),
        user("y", &[]),
        user("w", &[("x", 1.0)]),
    ]));

    svc.explore(&id("x"), 1, true, None).await.unwrap();
    // "x" is now reached at budget 0 and comes back partial.
    let merged = svc.explore(&id("w"), 1, false, None).await.unwrap();

    assert!(merged.contains_edge(&id("x"), &id("y")));
    assert!(!merged.node(&id("x")).unwrap().partial);
}

#[tokio::test]
async fn branch_failure_keeps_rest_of_snapshot() {
    let svc = service(
        MockUserFetcher::with_records([
            user("a", &[("b", 1.0), ("c", 1.0)]),
            user("b", &[]),
            user("c", &[]),
        ])
        .fail_on("b"),
    );

    let graph = svc.explore(&id("a"), 2, true, None).await.unwrap();

    assert!(graph.node(&id("a")).is_some());
    assert!(graph.node(&id("c")).is_some());
    assert!(graph.node(&id("b")).is_none());
}

#[tokio::test]
async fn start_failure_is_reported() {
    let svc = service(MockUserFetcher::default().fail_on("a"));
    let result = svc.explore(&id("a"), 2, true, None).await;
    assert!(matches!(
        result,
        Err(TrustGraphError::FetchFailure { identity, .. }) if identity == id("a")
    ));
    assert!(svc.graph().is_none());
}

#[tokio::test]
async fn superseded_exploration_is_discarded() {
    let fetcher = Arc::new(GatedFetcher {
        inner: MockUserFetcher::with_records([user("slow", &[]), user("fast", &[])]),
        gated: id("slow"),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let svc = Arc::new(TrustGraphService::new(
        TrustGraphConfig::default(),
        fetcher.clone(),
    ));

    let slow = {
        let svc = svc.clone();
        tokio::spawn(async move { svc.explore(&id("slow"), 1, true, None).await })
    };

    fetcher.entered.notified().await;
    svc.explore(&id("fast"), 1, true, None).await.unwrap();
    fetcher.release.notify_one();

    let result = slow.await.unwrap();
    assert_eq!(
        result,
        Err(TrustGraphError::StaleGeneration {
            issued: 1,
            current: 2
        })
    );

    let graph = svc.graph().unwrap();
    assert!(graph.node(&id("fast")).is_some());
    assert!(graph.node(&id("slow")).is_none());
}
