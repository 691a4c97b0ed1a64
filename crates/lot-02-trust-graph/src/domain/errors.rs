//! # Domain Errors
//!
//! Error types for trust-graph synchronization.
//!
//! An identity with no record is not an error: the fetch returns `None` and
//! no node or edge is created for it.

use shared_types::Identity;
use thiserror::Error;

/// Trust graph error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrustGraphError {
    /// The external fetch capability failed for an identity.
    #[error("Fetch failed for {identity}: {reason}")]
    FetchFailure {
        /// Identity being fetched
        identity: Identity,
        /// Failure reported by the fetcher
        reason: String,
    },

    /// The identity listing could not be retrieved.
    #[error("User directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// A newer exploration was issued while this one was in flight.
    #[error("Exploration {issued} superseded by {current}")]
    StaleGeneration {
        /// Generation of the discarded exploration
        issued: u64,
        /// Latest issued generation
        current: u64,
    },
}

/// Preference store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    /// Backing storage could not be read or written.
    #[error("Preference storage error: {0}")]
    Storage(String),

    /// A stored value could not be encoded or decoded.
    #[error("Preference encoding error: {0}")]
    Encoding(String),
}
