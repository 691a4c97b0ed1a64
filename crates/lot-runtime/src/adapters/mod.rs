//! # Adapters
//!
//! Port implementations connecting the subsystems to the outside world.
//!
//! - `rpc_client`: NEAR JSON-RPC transport
//! - `state_source`: `view_state` dumps (lot-01 `StateDumpSource`)
//! - `user_fetcher`: `get_user_data` and snapshot record sources (lot-02 `UserFetcher`)
//! - `preference_file`: JSON-file preferences (lot-02 `PreferenceStore`)

pub mod preference_file;
pub mod rpc_client;
pub mod state_source;
pub mod user_fetcher;

pub use preference_file::JsonFilePreferenceStore;
pub use rpc_client::{NearRpcClient, RpcError};
pub use state_source::RpcStateSource;
pub use user_fetcher::{RpcUserFetcher, SnapshotUserFetcher, UserDataView};
