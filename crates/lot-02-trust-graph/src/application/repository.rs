//! # User Repository
//!
//! Bounded cache of fetched user records. Registered as the traversal
//! observer, so every node a traversal adds refreshes its cache entry.

use lru::LruCache;
use parking_lot::Mutex;
use shared_types::{Identity, UserRecord};
use std::num::NonZeroUsize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

use crate::domain::TrustGraphError;
use crate::ports::{NodeObserver, UserFetcher};

/// One cached record.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedUser {
    /// Latest fetched record.
    pub record: UserRecord,
    /// Whether some traversal expanded this identity's relations.
    pub fully_fetched: bool,
    /// Unix time of the latest fetch, in milliseconds.
    pub updated_at_ms: u64,
}

/// LRU cache of user records.
pub struct UserRepository {
    users: Mutex<LruCache<Identity, CachedUser>>,
}

impl UserRepository {
    /// Repository holding at most `capacity` records (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            users: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Store a freshly fetched record.
    ///
    /// `fully_fetched` never goes back to false for a cached identity.
    pub fn update(&self, id: &Identity, record: UserRecord, fully_expanded: bool) {
        let mut users = self.users.lock();
        let fully_fetched = fully_expanded || users.peek(id).is_some_and(|u| u.fully_fetched);
        users.put(
            id.clone(),
            CachedUser {
                record,
                fully_fetched,
                updated_at_ms: now_ms(),
            },
        );
        trace!("[lot-02] Cached {} (fully fetched: {})", id, fully_fetched);
    }

    /// Cached record of `id`.
    pub fn get(&self, id: &Identity) -> Option<CachedUser> {
        self.users.lock().get(id).cloned()
    }

    /// Evict `id`.
    pub fn remove(&self, id: &Identity) -> Option<CachedUser> {
        self.users.lock().pop(id)
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }

    /// Re-fetch `id` and cache the result as fully fetched. A missing record
    /// evicts the cached one.
    pub async fn refresh<F: UserFetcher + ?Sized>(
        &self,
        fetcher: &F,
        id: &Identity,
    ) -> Result<Option<CachedUser>, TrustGraphError> {
        match fetcher.fetch_user(id).await? {
            Some(record) => {
                self.update(id, record, true);
                Ok(self.get(id))
            }
            None => {
                self.remove(id);
                Ok(None)
            }
        }
    }
}

impl NodeObserver for UserRepository {
    fn on_node_fetched(&self, id: &Identity, record: &UserRecord, fully_expanded: bool) {
        self.update(id, record.clone(), fully_expanded);
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
