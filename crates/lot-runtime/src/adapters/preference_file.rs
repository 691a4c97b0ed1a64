//! `PreferenceStore` persisted as one JSON object on disk.

use lot_02_trust_graph::{PreferenceError, PreferenceStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON-file `PreferenceStore`. Every write rewrites the file.
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    /// Open `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| PreferenceError::Encoding(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(PreferenceError::Storage(format!("{}: {}", path.display(), e)));
            }
        };

        debug!("[lot-rt] Opened {} with {} preferences", path.display(), values.len());
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), PreferenceError> {
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| PreferenceError::Encoding(e.to_string()))?;

        // Readers never observe a partially written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| PreferenceError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.write();
        let mut updated = values.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *values = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.write();
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut updated = values.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *values = updated;
        Ok(())
    }
}
