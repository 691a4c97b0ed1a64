//! View-State Adapter
//!
//! Converts the JSON `view_state` result (base64 keys and values) into a
//! `StateDump`, and serves dumps saved to disk in that format.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{StateDump, StateEntry, StateSourceError};
use crate::ports::outbound::StateDumpSource;

/// One base64-encoded storage pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewStateValue {
    /// Base64 key.
    pub key: String,
    /// Base64 value.
    pub value: String,
}

/// `view_state` query result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewStateResult {
    /// All storage pairs.
    pub values: Vec<ViewStateValue>,
    /// Block hash the state was read at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    /// Block height the state was read at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
}

impl TryFrom<ViewStateResult> for StateDump {
    type Error = StateSourceError;

    fn try_from(result: ViewStateResult) -> Result<Self, Self::Error> {
        let entries = result
            .values
            .into_iter()
            .map(|pair| {
                let key = STANDARD
                    .decode(&pair.key)
                    .map_err(|e| StateSourceError::Malformed(format!("key {:?}: {}", pair.key, e)))?;
                let value = STANDARD
                    .decode(&pair.value)
                    .map_err(|e| StateSourceError::Malformed(format!("value of {:?}: {}", pair.key, e)))?;
                Ok(StateEntry { key, value })
            })
            .collect::<Result<Vec<_>, StateSourceError>>()?;

        Ok(StateDump {
            entries,
            block_height: result.block_height,
            block_hash: result.block_hash,
        })
    }
}

impl From<&StateDump> for ViewStateResult {
    fn from(dump: &StateDump) -> Self {
        Self {
            values: dump
                .entries
                .iter()
                .map(|entry| ViewStateValue {
                    key: STANDARD.encode(&entry.key),
                    value: STANDARD.encode(&entry.value),
                })
                .collect(),
            block_hash: dump.block_hash.clone(),
            block_height: dump.block_height,
        }
    }
}

/// Parse a `view_state` result, bare or wrapped in a JSON-RPC envelope
/// (`{"result": {...}}`).
pub fn parse_view_state(json: Value) -> Result<StateDump, StateSourceError> {
    let body = match json {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    };
    let result: ViewStateResult =
        serde_json::from_value(body).map_err(|e| StateSourceError::Malformed(e.to_string()))?;
    StateDump::try_from(result)
}

/// Parse `view_state` JSON text.
pub fn parse_view_state_str(text: &str) -> Result<StateDump, StateSourceError> {
    let json: Value =
        serde_json::from_str(text).map_err(|e| StateSourceError::Malformed(e.to_string()))?;
    parse_view_state(json)
}

/// Dump saved on disk as `view_state` JSON.
pub struct ViewStateFileSource {
    path: PathBuf,
    id: String,
}

impl ViewStateFileSource {
    /// Source reading `path` on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = format!("file:{}", path.display());
        Self { path, id }
    }
}

#[async_trait]
impl StateDumpSource for ViewStateFileSource {
    async fn fetch_state(&self) -> Result<StateDump, StateSourceError> {
        debug!("[lot-01] Reading state dump from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StateSourceError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        parse_view_state_str(&text)
    }

    fn source_id(&self) -> &str {
        &self.id
    }
}
