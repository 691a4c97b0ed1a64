//! # Outbound Ports
//!
//! Traits for external dependencies (record source, identity listing, cache
//! observer, preference storage).

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Identity, UserRecord};
use std::collections::{HashMap, HashSet};

use crate::domain::{PreferenceError, TrustGraphError};

/// User record source - outbound port.
///
/// `Ok(None)` means the identity has no record; it is not an error.
#[async_trait]
pub trait UserFetcher: Send + Sync {
    /// Fetch the current record of `id`.
    async fn fetch_user(&self, id: &Identity) -> Result<Option<UserRecord>, TrustGraphError>;
}

/// Lists every identity known to the record source - outbound port.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All registered identities.
    async fn list_identities(&self) -> Result<Vec<Identity>, TrustGraphError>;
}

/// Notified once per node added during a traversal.
pub trait NodeObserver: Send + Sync {
    /// `fully_expanded` is false for frontier (depth-exhausted) nodes.
    fn on_node_fetched(&self, id: &Identity, record: &UserRecord, fully_expanded: bool);
}

/// Durable string key-value store - outbound port.
pub trait PreferenceStore: Send + Sync {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Store `value` under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), PreferenceError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock record source for testing.
#[derive(Default)]
pub struct MockUserFetcher {
    /// Records by identity.
    pub records: HashMap<Identity, UserRecord>,
    /// Identities whose fetch fails.
    pub failing: HashSet<Identity>,
    /// Every identity fetched, in order.
    pub fetch_log: Mutex<Vec<Identity>>,
}

impl MockUserFetcher {
    /// Fetcher serving `records`.
    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
            ..Default::default()
        }
    }

    /// Make fetches of `id` fail.
    pub fn fail_on(mut self, id: impl Into<Identity>) -> Self {
        self.failing.insert(id.into());
        self
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: UserRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Identities fetched so far.
    pub fn fetched(&self) -> Vec<Identity> {
        self.fetch_log.lock().clone()
    }
}

#[async_trait]
impl UserFetcher for MockUserFetcher {
    async fn fetch_user(&self, id: &Identity) -> Result<Option<UserRecord>, TrustGraphError> {
        self.fetch_log.lock().push(id.clone());
        if self.failing.contains(id) {
            return Err(TrustGraphError::FetchFailure {
                identity: id.clone(),
                reason: "Mock failure".to_string(),
            });
        }
        Ok(self.records.get(id).cloned())
    }
}

#[async_trait]
impl UserDirectory for MockUserFetcher {
    async fn list_identities(&self) -> Result<Vec<Identity>, TrustGraphError> {
        let mut ids: Vec<Identity> = self.records.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
