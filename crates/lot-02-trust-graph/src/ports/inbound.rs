//! # Inbound Ports
//!
//! API trait defining what the trust-graph engine can do.

use async_trait::async_trait;
use shared_types::Identity;

use crate::domain::{TrustGraph, TrustGraphError};

/// Trust Graph API - inbound port.
#[async_trait]
pub trait TrustGraphApi: Send + Sync {
    /// Traverse from `start` and merge the snapshot into the accumulated
    /// graph. Returns the merged graph.
    async fn explore(
        &self,
        start: &Identity,
        depth: i32,
        is_main_node: bool,
        selected: Option<&Identity>,
    ) -> Result<TrustGraph, TrustGraphError>;

    /// Explore from an account id as the main, selected node.
    ///
    /// Uses the configured default depth when `depth` is `None`.
    async fn explore_account(
        &self,
        account_id: &str,
        depth: Option<i32>,
    ) -> Result<TrustGraph, TrustGraphError>;

    /// Current accumulated graph.
    fn graph(&self) -> Option<TrustGraph>;

    /// Make `id` the only selected node. Returns the updated graph, or
    /// `None` if `id` is not in it.
    fn select(&self, id: &Identity) -> Option<TrustGraph>;

    /// Drop the accumulated graph.
    fn reset(&self);
}
