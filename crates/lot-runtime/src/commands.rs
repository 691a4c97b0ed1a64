//! Command implementations shared by the binary and the integration tests.

use anyhow::{Context, Result};
use lot_01_contract_state::{ContractStateService, ContractStateSnapshot, ViewStateFileSource};
use lot_02_trust_graph::{
    NodePreferences, PreferenceStore, TrustGraph, TrustGraphApi, TrustGraphConfig,
    TrustGraphService, UserDirectory, UserFetcher,
};
use shared_types::{Identity, UserRecord};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::adapters::{NearRpcClient, RpcStateSource};
use crate::config::RuntimeConfig;

/// Where an exploration starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExploreTarget {
    /// Plain account id, hashed before use.
    Account(String),
    /// Already hashed identity.
    Identity(Identity),
}

/// Decode the contract storage from a saved dump, or from RPC when `dump` is
/// `None`.
pub async fn load_snapshot(
    config: &RuntimeConfig,
    dump: Option<&Path>,
) -> Result<ContractStateSnapshot> {
    let service = ContractStateService::new(config.decoder.clone());

    let snapshot = match dump {
        Some(path) => service
            .load(&ViewStateFileSource::new(path))
            .await
            .with_context(|| format!("Failed to load dump {}", path.display()))?,
        None => {
            let client = Arc::new(NearRpcClient::new(config.rpc_url()));
            service
                .load(&RpcStateSource::new(client, config.contract_id.clone()))
                .await
                .with_context(|| format!("Failed to read state of {}", config.contract_id))?
        }
    };

    info!("[lot-rt] Snapshot holds {} users", snapshot.len());
    Ok(snapshot)
}

/// Run one exploration and return the resulting graph.
pub async fn explore<F: UserFetcher>(
    fetcher: Arc<F>,
    config: &TrustGraphConfig,
    target: &ExploreTarget,
    depth: Option<i32>,
) -> Result<TrustGraph> {
    let service = TrustGraphService::new(config.clone(), fetcher);

    let graph = match target {
        ExploreTarget::Account(account_id) => service.explore_account(account_id, depth).await?,
        ExploreTarget::Identity(id) => {
            let depth = depth.unwrap_or(config.default_depth);
            service.explore(id, depth, true, Some(id)).await?
        }
    };

    Ok(graph)
}

/// List every registered identity and fetch its record.
pub async fn poll_users<F: UserFetcher + UserDirectory>(
    fetcher: Arc<F>,
    config: &TrustGraphConfig,
) -> Result<BTreeMap<Identity, UserRecord>> {
    let service = TrustGraphService::new(config.clone(), fetcher);
    Ok(service.poll_all_users().await?)
}

/// One line per polled user: name, trust cost, outgoing trust count.
pub fn render_user_list<S: PreferenceStore>(
    records: &BTreeMap<Identity, UserRecord>,
    prefs: &NodePreferences<S>,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{} users", records.len())?;
    for (id, record) in records {
        writeln!(
            out,
            "  {}  cost {}  trusts {}",
            prefs.display_name(id)?,
            record.requested_trust_cost,
            record.trusted_targets().count()
        )?;
    }
    Ok(())
}

/// Print every decoded user.
pub fn render_users(snapshot: &ContractStateSnapshot, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "block {} {}",
        snapshot
            .block_height
            .map_or_else(|| "?".to_string(), |h| h.to_string()),
        snapshot.block_hash.as_deref().unwrap_or("?")
    )?;

    for state in snapshot.users.values() {
        let record = &state.record;
        writeln!(out, "{}", record.id)?;
        writeln!(out, "  cost:    {}", record.requested_trust_cost)?;
        writeln!(out, "  profile: {}", record.profile)?;
        for relation in &record.trust_relations {
            writeln!(out, "  trusts:  {} ({})", relation.target, relation.weight)?;
        }
        for (target, request) in &state.pending_requests {
            writeln!(
                out,
                "  pending: {} deposit {} expires {}",
                target, request.deposit, request.expiry
            )?;
        }
        for (target, amount) in &state.deposits {
            writeln!(out, "  deposit: {} {}", target, amount)?;
        }
        if !state.private_profile.is_empty() {
            writeln!(out, "  private entries: {}", state.private_profile.len())?;
        }
    }

    Ok(())
}

/// Print nodes (alias-resolved) then edges.
pub fn render_graph<S: PreferenceStore>(
    graph: &TrustGraph,
    prefs: &NodePreferences<S>,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{} nodes, {} edges", graph.node_count(), graph.edge_count())?;

    for node in graph.nodes.values() {
        let mut flags = Vec::new();
        if node.is_main_node {
            flags.push("main");
        }
        if node.is_selected {
            flags.push("selected");
        }
        if node.partial {
            flags.push("partial");
        }

        let name = prefs.display_name(&node.id)?;
        if flags.is_empty() {
            writeln!(out, "  {}", name)?;
        } else {
            writeln!(out, "  {} [{}]", name, flags.join(", "))?;
        }
    }

    for edge in &graph.edges {
        writeln!(
            out,
            "  {} -> {}",
            prefs.display_name(&edge.source)?,
            prefs.display_name(&edge.target)?
        )?;
    }

    Ok(())
}
