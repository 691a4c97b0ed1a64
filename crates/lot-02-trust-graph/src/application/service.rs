//! # Trust Graph Service
//!
//! Application service owning the accumulated graph.
//!
//! Every exploration takes a generation number when issued. Traversals run
//! concurrently, but merges are serialized under one lock, and a result
//! whose generation is no longer the latest is discarded instead of merged.
//! Results therefore never apply out of order.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Identity, UserRecord};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::algorithms::{fetch_many, merge, TrustGraphBuilder};
use crate::application::repository::UserRepository;
use crate::config::TrustGraphConfig;
use crate::domain::{TrustGraph, TrustGraphError};
use crate::ports::{TrustGraphApi, UserDirectory, UserFetcher};

/// Trust Graph Service - explores, merges, and holds the graph.
pub struct TrustGraphService<F: UserFetcher> {
    /// Configuration.
    config: TrustGraphConfig,
    /// Record source.
    fetcher: Arc<F>,
    /// Record cache, fed by every traversal.
    repository: Arc<UserRepository>,
    /// Accumulated graph.
    graph: Mutex<Option<TrustGraph>>,
    /// Latest issued exploration.
    generation: AtomicU64,
}

impl<F: UserFetcher> TrustGraphService<F> {
    /// Create a service with a fresh repository.
    pub fn new(config: TrustGraphConfig, fetcher: Arc<F>) -> Self {
        let repository = Arc::new(UserRepository::new(config.repository_capacity));
        Self::with_repository(config, fetcher, repository)
    }

    /// Create a service sharing `repository`.
    pub fn with_repository(
        config: TrustGraphConfig,
        fetcher: Arc<F>,
        repository: Arc<UserRepository>,
    ) -> Self {
        Self {
            config,
            fetcher,
            repository,
            graph: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &TrustGraphConfig {
        &self.config
    }

    /// Record cache.
    pub fn repository(&self) -> &Arc<UserRepository> {
        &self.repository
    }

    /// Latest issued generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl<F: UserFetcher + UserDirectory> TrustGraphService<F> {
    /// List every registered identity, fetch each record, and cache the
    /// results. Identities whose fetch fails or finds nothing are left out.
    ///
    /// Polled records do not count as explored: `fully_fetched` is only
    /// kept if an earlier traversal set it.
    pub async fn poll_all_users(&self) -> Result<BTreeMap<Identity, UserRecord>, TrustGraphError> {
        let ids = self.fetcher.list_identities().await?;
        let records = fetch_many(self.fetcher.as_ref(), &ids).await;

        for (id, record) in &records {
            self.repository.update(id, record.clone(), false);
        }

        info!("[lot-02] Polled {} of {} listed users", records.len(), ids.len());
        Ok(records)
    }
}

#[async_trait]
impl<F: UserFetcher> TrustGraphApi for TrustGraphService<F> {
    async fn explore(
        &self,
        start: &Identity,
        depth: i32,
        is_main_node: bool,
        selected: Option<&Identity>,
    ) -> Result<TrustGraph, TrustGraphError> {
        let issued = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("[lot-02] Exploration {} from {} (depth {})", issued, start, depth);

        let snapshot = TrustGraphBuilder::new(self.fetcher.as_ref())
            .with_observer(self.repository.as_ref())
            .traverse(start, depth, is_main_node)
            .await?;

        let mut guard = self.graph.lock();
        let current = self.generation.load(Ordering::SeqCst);
        if current != issued {
            info!(
                "[lot-02] Discarding exploration {} from {}: superseded by {}",
                issued, start, current
            );
            return Err(TrustGraphError::StaleGeneration { issued, current });
        }

        let merged = merge(guard.take(), snapshot, selected);

        info!(
            "[lot-02] Exploration {} merged: {} nodes, {} edges",
            issued,
            merged.node_count(),
            merged.edge_count()
        );

        *guard = Some(merged.clone());
        Ok(merged)
    }

    async fn explore_account(
        &self,
        account_id: &str,
        depth: Option<i32>,
    ) -> Result<TrustGraph, TrustGraphError> {
        let id = Identity::from_account_id(account_id);
        let depth = depth.unwrap_or(self.config.default_depth);
        self.explore(&id, depth, true, Some(&id)).await
    }

    fn graph(&self) -> Option<TrustGraph> {
        self.graph.lock().clone()
    }

    fn select(&self, id: &Identity) -> Option<TrustGraph> {
        let mut guard = self.graph.lock();
        let graph = guard.as_mut()?;
        if !graph.nodes.contains_key(id) {
            return None;
        }
        for node in graph.nodes.values_mut() {
            node.is_selected = &node.id == id;
        }
        Some(graph.clone())
    }

    fn reset(&self) {
        // Outstanding explorations become stale.
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.graph.lock() = None;
        debug!("[lot-02] Graph reset");
    }
}
