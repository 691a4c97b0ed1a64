//! # Node Preferences
//!
//! Per-identity display preferences (alias, layout position) persisted as
//! strings in a `PreferenceStore`.

use serde::{Deserialize, Serialize};
use shared_types::Identity;

use crate::domain::PreferenceError;
use crate::ports::PreferenceStore;

/// Saved layout position of a node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Typed view over a preference store.
pub struct NodePreferences<S: PreferenceStore> {
    store: S,
}

impl<S: PreferenceStore> NodePreferences<S> {
    /// Preferences backed by `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// User-chosen alias of `id`.
    pub fn alias(&self, id: &Identity) -> Result<Option<String>, PreferenceError> {
        self.store.get(&alias_key(id))
    }

    /// Set the alias of `id`. An empty alias clears it.
    pub fn set_alias(&self, id: &Identity, alias: &str) -> Result<(), PreferenceError> {
        let alias = alias.trim();
        if alias.is_empty() {
            return self.store.remove(&alias_key(id));
        }
        self.store.set(&alias_key(id), alias)
    }

    /// Display name: alias if set, otherwise the identity.
    pub fn display_name(&self, id: &Identity) -> Result<String, PreferenceError> {
        Ok(self.alias(id)?.unwrap_or_else(|| id.to_string()))
    }

    /// Saved position of `id`.
    pub fn position(&self, id: &Identity) -> Result<Option<NodePosition>, PreferenceError> {
        self.store
            .get(&position_key(id))?
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| PreferenceError::Encoding(e.to_string()))
            })
            .transpose()
    }

    /// Save the position of `id`.
    pub fn set_position(&self, id: &Identity, position: NodePosition) -> Result<(), PreferenceError> {
        let json =
            serde_json::to_string(&position).map_err(|e| PreferenceError::Encoding(e.to_string()))?;
        self.store.set(&position_key(id), &json)
    }
}

fn alias_key(id: &Identity) -> String {
    format!("alias:{}", id)
}

fn position_key(id: &Identity) -> String {
    format!("position:{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryPreferenceStore;

    #[test]
    fn test_alias_round_trip() {
        let prefs = NodePreferences::new(InMemoryPreferenceStore::new("test"));
        let id = Identity::new("abc");

        assert_eq!(prefs.alias(&id).unwrap(), None);
        assert_eq!(prefs.display_name(&id).unwrap(), "abc");

        prefs.set_alias(&id, " Alice ").unwrap();
        assert_eq!(prefs.alias(&id).unwrap().as_deref(), Some("Alice"));
        assert_eq!(prefs.display_name(&id).unwrap(), "Alice");

        prefs.set_alias(&id, "").unwrap();
        assert_eq!(prefs.alias(&id).unwrap(), None);
    }

    #[test]
    fn test_position_round_trip() {
        let prefs = NodePreferences::new(InMemoryPreferenceStore::new("test"));
        let id = Identity::new("abc");
        prefs
            .set_position(&id, NodePosition { x: 10.5, y: -3.0 })
            .unwrap();
        assert_eq!(
            prefs.position(&id).unwrap(),
            Some(NodePosition { x: 10.5, y: -3.0 })
        );
    }

    #[test]
    fn test_corrupt_position_is_encoding_error() {
        let store = InMemoryPreferenceStore::new("test");
        store.set("position:abc", "not json").unwrap();
        let prefs = NodePreferences::new(store);
        assert!(matches!(
            prefs.position(&Identity::new("abc")),
            Err(PreferenceError::Encoding(_))
        ));
    }
}
