//! # Trust Graph Configuration

use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_DEPTH;

/// Trust graph configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustGraphConfig {
    /// Depth used when an exploration does not specify one.
    pub default_depth: i32,

    /// Maximum records kept by the user repository.
    pub repository_capacity: usize,
}

impl Default for TrustGraphConfig {
    fn default() -> Self {
        Self {
            default_depth: DEFAULT_DEPTH,
            repository_capacity: 1024,
        }
    }
}

impl TrustGraphConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            default_depth: 1,
            repository_capacity: 16,
        }
    }
}
