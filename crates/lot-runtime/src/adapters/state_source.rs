//! `StateDumpSource` over the NEAR `view_state` query.

use async_trait::async_trait;
use lot_01_contract_state::{StateDump, StateDumpSource, StateSourceError};
use std::sync::Arc;
use tracing::info;

use super::rpc_client::NearRpcClient;

/// Reads the contract's storage through RPC.
pub struct RpcStateSource {
    client: Arc<NearRpcClient>,
    contract_id: String,
    prefix: Vec<u8>,
    id: String,
}

impl RpcStateSource {
    /// Source reading every key of `contract_id`.
    pub fn new(client: Arc<NearRpcClient>, contract_id: impl Into<String>) -> Self {
        let contract_id = contract_id.into();
        let id = format!("rpc:{}@{}", contract_id, client.rpc_url());
        Self {
            client,
            contract_id,
            prefix: Vec::new(),
            id,
        }
    }

    /// Only read keys starting with `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

#[async_trait]
impl StateDumpSource for RpcStateSource {
    async fn fetch_state(&self) -> Result<StateDump, StateSourceError> {
        let dump = self
            .client
            .view_state(&self.contract_id, &self.prefix)
            .await
            .map_err(|e| StateSourceError::Unavailable(e.to_string()))?;

        info!(
            "[lot-rt] view_state {} returned {} entries at height {:?}",
            self.contract_id,
            dump.entries.len(),
            dump.block_height
        );
        Ok(dump)
    }

    fn source_id(&self) -> &str {
        &self.id
    }
}
