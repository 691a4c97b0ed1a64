//! User record sources for the trust-graph engine: the contract's
//! `get_user_data` and `view_users` view methods, or a decoded state snapshot.

use async_trait::async_trait;
use lot_01_contract_state::ContractStateSnapshot;
use lot_02_trust_graph::{TrustGraphError, UserDirectory, UserFetcher};
use serde_json::json;
use serde::{Deserialize, Serialize};
use shared_types::{Identity, TokenAmount, TrustRelation, UserRecord};
use std::sync::Arc;

use super::rpc_client::NearRpcClient;

/// JSON returned by the contract's `get_user_data` view method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDataView {
    /// Base58 hashed user id.
    pub hashed_user_id: String,
    /// Trust request cost (yocto units, decimal string).
    pub requested_trust_cost: String,
    /// Public profile text.
    pub public_profile: String,
    /// Private profile entries.
    #[serde(default)]
    pub private_profile: Vec<(String, String)>,
    /// Trust weights by target.
    #[serde(default)]
    pub trust_network: Vec<(String, f32)>,
    /// Pending requests: target, (deposit, expiry).
    #[serde(default)]
    pub trust_requests: Vec<(String, (String, u64))>,
    /// Blocked requests: target, deposit.
    #[serde(default)]
    pub blocked_requests: Vec<(String, String)>,
    /// Accepted deposits: target, deposit.
    #[serde(default)]
    pub accepted_deposits: Vec<(String, String)>,
    /// Plain account id, when the contract knows it.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TryFrom<UserDataView> for UserRecord {
    type Error = String;

    fn try_from(view: UserDataView) -> Result<Self, Self::Error> {
        let requested_trust_cost = TokenAmount::parse(&view.requested_trust_cost)
            .map_err(|e| format!("requested_trust_cost: {}", e))?;

        Ok(UserRecord {
            id: Identity::new(view.hashed_user_id),
            requested_trust_cost,
            profile: view.public_profile,
            trust_relations: view
                .trust_network
                .into_iter()
                .map(|(target, weight)| TrustRelation::new(target, weight))
                .collect(),
        })
    }
}

/// Fetches records through the contract's `get_user_data` view method.
pub struct RpcUserFetcher {
    client: Arc<NearRpcClient>,
    contract_id: String,
}

impl RpcUserFetcher {
    /// Fetcher calling `contract_id` through `client`.
    pub fn new(client: Arc<NearRpcClient>, contract_id: impl Into<String>) -> Self {
        Self {
            client,
            contract_id: contract_id.into(),
        }
    }
}

#[derive(Serialize)]
struct GetUserDataArgs<'a> {
    user_id: &'a str,
}

#[async_trait]
impl UserFetcher for RpcUserFetcher {
    async fn fetch_user(&self, id: &Identity) -> Result<Option<UserRecord>, TrustGraphError> {
        let failure = |reason: String| TrustGraphError::FetchFailure {
            identity: id.clone(),
            reason,
        };

        let view: Option<UserDataView> = self
            .client
            .view_function(
                &self.contract_id,
                "get_user_data",
                &GetUserDataArgs {
                    user_id: id.as_str(),
                },
            )
            .await
            .map_err(|e| failure(e.to_string()))?;

        view.map(UserRecord::try_from).transpose().map_err(failure)
    }
}

#[async_trait]
impl UserDirectory for RpcUserFetcher {
    async fn list_identities(&self) -> Result<Vec<Identity>, TrustGraphError> {
        self.client
            .view_function(&self.contract_id, "view_users", &json!({}))
            .await
            .map_err(|e| TrustGraphError::DirectoryUnavailable(e.to_string()))
    }
}

/// Serves records from a decoded storage snapshot.
pub struct SnapshotUserFetcher {
    snapshot: ContractStateSnapshot,
}

impl SnapshotUserFetcher {
    /// Fetcher over `snapshot`.
    pub fn new(snapshot: ContractStateSnapshot) -> Self {
        Self { snapshot }
    }

    /// Underlying snapshot.
    pub fn snapshot(&self) -> &ContractStateSnapshot {
        &self.snapshot
    }
}

#[async_trait]
impl UserFetcher for SnapshotUserFetcher {
    async fn fetch_user(&self, id: &Identity) -> Result<Option<UserRecord>, TrustGraphError> {
        Ok(self.snapshot.user(id).cloned())
    }
}

#[async_trait]
impl UserDirectory for SnapshotUserFetcher {
    async fn list_identities(&self) -> Result<Vec<Identity>, TrustGraphError> {
        Ok(self.snapshot.users.keys().cloned().collect())
    }
}
