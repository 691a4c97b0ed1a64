//! # Core Domain Entities
//!
//! Defines the entities exchanged between the storage decoder, the
//! trust-graph engine and the runtime adapters.
//!
//! ## Clusters
//!
//! - **Identity**: `Identity` (hash-derived participant handle)
//! - **Value**: `TokenAmount`, `PendingRequest`
//! - **Records**: `TrustRelation`, `UserRecord`

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::TokenAmountError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Opaque handle for a participant: the base58 text of the SHA-256 hash of a
/// real-world account identifier.
///
/// Identities are compared byte-for-byte and are the unique key of every
/// node and edge map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an already-hashed identity string.
    pub fn new(hashed: impl Into<String>) -> Self {
        Self(hashed.into())
    }

    /// Derive the identity of an account id (e.g. `alice.testnet`).
    ///
    /// Matches the contract's hashed user id: `bs58(sha256(account_id))`.
    pub fn from_account_id(account_id: &str) -> Self {
        let digest = Sha256::digest(account_id.as_bytes());
        Self(bs58::encode(digest).into_string())
    }

    /// Borrow the textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the textual form.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// CLUSTER B: VALUE
// =============================================================================

/// Quantity of the native token in its smallest unit, kept as a digit string.
///
/// Values decoded from storage are taken as-is (the wire format stores them as
/// text); values built from user input go through [`TokenAmount::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TokenAmount(String);

impl TokenAmount {
    /// Parse a decimal digit string.
    pub fn parse(digits: &str) -> Result<Self, TokenAmountError> {
        if digits.is_empty() {
            return Err(TokenAmountError::Empty);
        }
        if let Some((position, found)) = digits.char_indices().find(|(_, c)| !c.is_ascii_digit())
        {
            return Err(TokenAmountError::NonDigit { found, position });
        }
        Ok(Self(digits.to_string()))
    }

    /// Wrap text read from storage without validation.
    pub fn from_wire(text: String) -> Self {
        Self(text)
    }

    /// Zero amount.
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    /// Borrow the digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if every digit is `0` (an empty wire string also counts as zero).
    pub fn is_zero(&self) -> bool {
        self.0.bytes().all(|b| b == b'0')
    }

    /// Numeric value, if the digits fit in a `u128`.
    pub fn to_u128(&self) -> Option<u128> {
        self.0.parse().ok()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u128> for TokenAmount {
    fn from(value: u128) -> Self {
        Self(value.to_string())
    }
}

/// A trust request waiting for the callee's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    /// Deposit locked by the requester.
    pub deposit: TokenAmount,
    /// Expiry timestamp.
    pub expiry: u64,
}

// =============================================================================
// CLUSTER C: RECORDS
// =============================================================================

/// Directed, weighted trust from the owning record to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustRelation {
    /// Trusted identity.
    pub target: Identity,
    /// Trust level. `<= 0.0` means no trust.
    pub weight: f32,
}

impl TrustRelation {
    /// Create a relation.
    pub fn new(target: impl Into<Identity>, weight: f32) -> Self {
        Self {
            target: target.into(),
            weight,
        }
    }

    /// Whether this relation materializes as a trust edge.
    pub fn is_trust(&self) -> bool {
        self.weight > 0.0
    }
}

/// One participant's record as returned by a fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identity of the participant.
    pub id: Identity,
    /// Deposit required to request this participant's trust.
    pub requested_trust_cost: TokenAmount,
    /// Public profile text.
    pub profile: String,
    /// Outward trust relations, in source order.
    pub trust_relations: Vec<TrustRelation>,
}

impl UserRecord {
    /// Create a record without relations.
    pub fn new(id: impl Into<Identity>, requested_trust_cost: TokenAmount, profile: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            requested_trust_cost,
            profile: profile.into(),
            trust_relations: Vec::new(),
        }
    }

    /// Builder-style relation append.
    pub fn with_relation(mut self, target: impl Into<Identity>, weight: f32) -> Self {
        self.trust_relations.push(TrustRelation::new(target, weight));
        self
    }

    /// Targets of relations with strictly positive weight, in source order.
    pub fn trusted_targets(&self) -> impl Iterator<Item = &Identity> + '_ {
        self.trust_relations
            .iter()
            .filter(|relation| relation.is_trust())
            .map(|relation| &relation.target)
    }
}
