//! # Domain Entities
//!
//! Storage entries, decoded fixed records and the assembled contract-state
//! snapshot.

use serde::{Deserialize, Serialize};
use shared_types::{Identity, PendingRequest, TokenAmount, UserRecord};
use std::collections::BTreeMap;

/// One raw `(key, value)` pair of a contract storage dump.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    /// Raw key bytes.
    pub key: Vec<u8>,
    /// Raw value bytes.
    pub value: Vec<u8>,
}

impl StateEntry {
    /// Create an entry.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A full, unordered storage dump plus the block it was read at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDump {
    /// All entries, in no particular order.
    pub entries: Vec<StateEntry>,
    /// Block height of the dump, when the source reports it.
    pub block_height: Option<u64>,
    /// Block hash of the dump, when the source reports it.
    pub block_hash: Option<String>,
}

impl StateDump {
    /// Dump without block metadata.
    pub fn from_entries(entries: Vec<StateEntry>) -> Self {
        Self {
            entries,
            block_height: None,
            block_hash: None,
        }
    }
}

/// Length-prefixed header blobs of the four sub-collections stored beside a
/// fixed record. Each blob is the key prefix under which that
/// sub-collection's entries live.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubMapHeaders {
    /// Private profile texts keyed by viewer identity.
    pub profile: Vec<u8>,
    /// Trust weights keyed by trusted identity.
    pub trust: Vec<u8>,
    /// Pending trust requests keyed by requester identity.
    pub pending_requests: Vec<u8>,
    /// Accepted deposits keyed by depositor identity.
    pub deposits: Vec<u8>,
}

/// A decoded fixed-layout record with its sub-collection headers.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedRecord {
    /// Scalar fields. `trust_relations` is empty: relations live in the
    /// trust sub-map.
    pub record: UserRecord,
    /// Headers of the out-of-line sub-collections.
    pub headers: SubMapHeaders,
}

/// One user's fixed record joined with its decoded sub-maps.
#[derive(Clone, Debug, PartialEq)]
pub struct UserState {
    /// Record with `trust_relations` filled from the trust sub-map.
    pub record: UserRecord,
    /// Private profile texts.
    pub private_profile: BTreeMap<Identity, String>,
    /// Pending trust requests.
    pub pending_requests: BTreeMap<Identity, PendingRequest>,
    /// Accepted deposits.
    pub deposits: BTreeMap<Identity, TokenAmount>,
}

/// Typed view of a whole storage dump.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContractStateSnapshot {
    /// Block height of the source dump.
    pub block_height: Option<u64>,
    /// Block hash of the source dump.
    pub block_hash: Option<String>,
    /// Users keyed by identity.
    pub users: BTreeMap<Identity, UserState>,
}

impl ContractStateSnapshot {
    /// Record of a user, if present.
    pub fn user(&self, id: &Identity) -> Option<&UserRecord> {
        self.users.get(id).map(|state| &state.record)
    }

    /// Number of decoded users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True if no user decoded.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
