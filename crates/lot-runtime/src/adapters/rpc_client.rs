//! JSON-RPC client for the NEAR `query` endpoint.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lot_01_contract_state::{parse_view_state, StateDump};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    params: T,
    id: u64,
}

/// JSON-RPC response structure.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code.
    pub code: i64,
    /// Short description.
    pub message: String,
    /// Node-specific detail.
    #[serde(default)]
    pub data: Option<Value>,
}

/// `call_function` query result.
#[derive(Debug, Deserialize)]
struct CallFunctionResult {
    /// Raw bytes returned by the contract (JSON text for view methods).
    #[serde(default)]
    result: Option<Vec<u8>>,
    /// Execution error reported inside a successful response.
    #[serde(default)]
    error: Option<String>,
}

/// RPC client errors.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Request could not be sent or the body could not be read.
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Node answered with a JSON-RPC error.
    #[error("RPC error {code}: {message}")]
    Node {
        /// Numeric error code.
        code: i64,
        /// Message and detail.
        message: String,
    },

    /// Contract execution failed.
    #[error("Contract error: {0}")]
    Contract(String),

    /// Response did not have the expected shape.
    #[error("Malformed RPC response: {0}")]
    Malformed(String),
}

/// NEAR JSON-RPC client.
pub struct NearRpcClient {
    http_client: reqwest::Client,
    rpc_url: String,
    request_id: AtomicU64,
}

impl NearRpcClient {
    /// Create a client with the default timeout.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self::with_timeout(rpc_url, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(rpc_url: impl Into<String>, timeout_secs: u64) -> Self {
        // Builder only fails on TLS backend init; fall back to defaults.
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client,
            rpc_url: rpc_url.into(),
            request_id: AtomicU64::new(1),
        }
    }

    /// Endpoint this client talks to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Make a JSON-RPC call.
    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        debug!("[lot-rt] RPC {} #{} -> {}", method, id, self.rpc_url);

        let response: JsonRpcResponse<R> = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        unwrap_response(response)
    }

    /// Full contract storage under `prefix` (`view_state`).
    pub async fn view_state(&self, account_id: &str, prefix: &[u8]) -> Result<StateDump, RpcError> {
        let params = json!({
            "request_type": "view_state",
            "finality": "final",
            "account_id": account_id,
            "prefix_base64": STANDARD.encode(prefix),
        });
        let result: Value = self.call("query", params).await?;
        parse_view_state(result).map_err(|e| RpcError::Malformed(e.to_string()))
    }

    /// Call a contract view method with JSON arguments and a JSON result.
    pub async fn view_function<A: Serialize, R: DeserializeOwned>(
        &self,
        account_id: &str,
        method_name: &str,
        args: &A,
    ) -> Result<R, RpcError> {
        let args = serde_json::to_vec(args).map_err(|e| RpcError::Malformed(e.to_string()))?;
        let params = json!({
            "request_type": "call_function",
            "finality": "final",
            "account_id": account_id,
            "method_name": method_name,
            "args_base64": STANDARD.encode(args),
        });
        let result: CallFunctionResult = self.call("query", params).await?;
        decode_call_result(result)
    }
}

fn unwrap_response<R>(response: JsonRpcResponse<R>) -> Result<R, RpcError> {
    if let Some(error) = response.error {
        let message = match error.data {
            Some(data) => format!("{} ({})", error.message, data),
            None => error.message,
        };
        return Err(RpcError::Node {
            code: error.code,
            message,
        });
    }

    response
        .result
        .ok_or_else(|| RpcError::Malformed("RPC response missing result".to_string()))
}

fn decode_call_result<R: DeserializeOwned>(result: CallFunctionResult) -> Result<R, RpcError> {
    if let Some(error) = result.error {
        return Err(RpcError::Contract(error));
    }
    let bytes = result
        .result
        .ok_or_else(|| RpcError::Malformed("call_function result missing".to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| RpcError::Malformed(e.to_string()))
}
