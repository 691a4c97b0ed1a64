//! In-memory preference store. Keys are namespaced so several stores can
//! share one backing map.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::PreferenceError;
use crate::ports::PreferenceStore;

/// Volatile `PreferenceStore`.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    prefix: String,
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryPreferenceStore {
    /// Store whose keys are prefixed with `prefix_`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            values: RwLock::new(HashMap::new()),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.read().get(&self.key(key)).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.write().insert(self.key(key), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        self.values.write().remove(&self.key(key));
        Ok(())
    }
}
