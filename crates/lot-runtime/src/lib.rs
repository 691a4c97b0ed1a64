//! # Link-of-Trust Runtime
//!
//! Wires the contract-state decoder (lot-01) and the trust-graph engine
//! (lot-02) to their outside world: the NEAR JSON-RPC endpoint, saved
//! `view_state` dumps, and a JSON preference file.
//!
//! ## Module Structure
//!
//! ```text
//! lot-runtime/
//! ├── adapters/     # RPC client, state source, user fetchers, preference file
//! ├── commands.rs   # decode / explore / users / render, shared with the binary
//! ├── config.rs     # defaults < TOML file < LOT_* environment
//! └── main.rs       # clap entry point
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod commands;
pub mod config;

pub use adapters::{
    JsonFilePreferenceStore, NearRpcClient, RpcError, RpcStateSource, RpcUserFetcher,
    SnapshotUserFetcher,
};
pub use commands::{
    explore, load_snapshot, poll_users, render_graph, render_user_list, render_users,
    ExploreTarget,
};
pub use config::{load_config, ConfigError, Network, RuntimeConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
