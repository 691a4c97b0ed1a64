//! # Link-of-Trust Runtime
//!
//! Command-line entry point.
//!
//! ## Startup Sequence
//!
//! 1. Parse arguments
//! 2. Initialize telemetry (`LOT_LOG_LEVEL`, `LOT_JSON_LOGS`)
//! 3. Load configuration (defaults, `--config` file, `LOT_*` environment)
//! 4. Run the requested command

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use lot_02_trust_graph::NodePreferences;
use lot_runtime::commands::{
    explore, load_snapshot, poll_users, render_graph, render_user_list, render_users,
    ExploreTarget,
};
use lot_runtime::config::{load_config, RuntimeConfig};
use lot_runtime::{JsonFilePreferenceStore, NearRpcClient, RpcUserFetcher, SnapshotUserFetcher};
use lot_telemetry::{init_telemetry, TelemetryConfig};
use shared_types::Identity;

/// Link-of-Trust contract state and trust network explorer
#[derive(Parser, Debug)]
#[command(name = "lot-runtime", version)]
#[command(about = "Decode Link-of-Trust contract state and explore its trust network")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "LOT_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode the contract storage and print every user
    Decode {
        /// Saved view_state result instead of a live RPC query
        #[arg(long)]
        dump: Option<PathBuf>,
    },

    /// Explore the trust network around one participant
    Explore {
        /// Plain account id (hashed by the contract)
        #[arg(long, conflicts_with = "identity", required_unless_present = "identity")]
        account: Option<String>,

        /// Hashed identity
        #[arg(long)]
        identity: Option<String>,

        /// Traversal depth (defaults to the configured depth)
        #[arg(long, allow_negative_numbers = true)]
        depth: Option<i32>,

        /// Explore a saved view_state result instead of calling the contract
        #[arg(long)]
        dump: Option<PathBuf>,

        /// Print the graph as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every registered user through the contract's user directory
    Users {
        /// List the users of a saved view_state result instead
        #[arg(long)]
        dump: Option<PathBuf>,
    },

    /// Set the display alias of an identity (an empty name clears it)
    Alias {
        /// Hashed identity
        identity: String,
        /// Display name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _telemetry = init_telemetry(TelemetryConfig::for_component("runtime"))
        .context("Failed to initialize telemetry")?;

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    info!(
        "[lot-rt] {} on {} ({})",
        config.contract_id,
        config.network,
        config.rpc_url()
    );

    let mut out = io::stdout().lock();

    match args.command {
        Command::Decode { dump } => {
            let snapshot = load_snapshot(&config, dump.as_deref()).await?;
            render_users(&snapshot, &mut out)?;
        }
        Command::Explore {
            account,
            identity,
            depth,
            dump,
            json,
        } => {
            let target = match (account, identity) {
                (Some(account_id), _) => ExploreTarget::Account(account_id),
                (None, Some(id)) => ExploreTarget::Identity(Identity::new(id)),
                (None, None) => anyhow::bail!("--account or --identity is required"),
            };

            let graph = match dump {
                Some(path) => {
                    let snapshot = load_snapshot(&config, Some(&path)).await?;
                    let fetcher = Arc::new(SnapshotUserFetcher::new(snapshot));
                    explore(fetcher, &config.graph, &target, depth).await?
                }
                None => {
                    let fetcher = Arc::new(rpc_fetcher(&config));
                    explore(fetcher, &config.graph, &target, depth).await?
                }
            };

            if json {
                serde_json::to_writer_pretty(&mut out, &graph)?;
                writeln!(out)?;
            } else {
                render_graph(&graph, &preferences(&config)?, &mut out)?;
            }
        }
        Command::Users { dump } => {
            let records = match dump {
                Some(path) => {
                    let snapshot = load_snapshot(&config, Some(&path)).await?;
                    poll_users(Arc::new(SnapshotUserFetcher::new(snapshot)), &config.graph).await?
                }
                None => poll_users(Arc::new(rpc_fetcher(&config)), &config.graph).await?,
            };
            render_user_list(&records, &preferences(&config)?, &mut out)?;
        }
        Command::Alias { identity, name } => {
            let prefs = preferences(&config)?;
            let id = Identity::new(identity);
            prefs.set_alias(&id, &name)?;
            writeln!(out, "{} -> {}", id, prefs.display_name(&id)?)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn rpc_fetcher(config: &RuntimeConfig) -> RpcUserFetcher {
    let client = Arc::new(NearRpcClient::new(config.rpc_url()));
    RpcUserFetcher::new(client, config.contract_id.clone())
}

fn preferences(config: &RuntimeConfig) -> Result<NodePreferences<JsonFilePreferenceStore>> {
    let store = JsonFilePreferenceStore::open(&config.preferences_path).with_context(|| {
        format!(
            "Failed to open preferences {}",
            config.preferences_path.display()
        )
    })?;
    Ok(NodePreferences::new(store))
}
