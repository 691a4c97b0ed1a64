//! # Contract State Configuration
//!
//! Key layout and decoding policy for storage dumps.

use serde::{Deserialize, Serialize};

/// Default key prefix of fixed user records (`u`).
pub const DEFAULT_USER_PREFIX: &[u8] = b"u";

/// What to do with bytes left after the last fixed-record field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingBytesPolicy {
    /// Accept the record and log the leftover length.
    #[default]
    Tolerate,
    /// Fail the record with `TrailingBytes`.
    Reject,
}

/// Contract state decoder configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractStateConfig {
    /// Key prefix under which fixed user records are stored.
    pub user_prefix: Vec<u8>,

    /// Leftover-bytes policy for fixed records.
    pub trailing_bytes: TrailingBytesPolicy,
}

impl Default for ContractStateConfig {
    fn default() -> Self {
        Self {
            user_prefix: DEFAULT_USER_PREFIX.to_vec(),
            trailing_bytes: TrailingBytesPolicy::Tolerate,
        }
    }
}

impl ContractStateConfig {
    /// Create a config for testing (strict decoding).
    pub fn for_testing() -> Self {
        Self {
            user_prefix: DEFAULT_USER_PREFIX.to_vec(),
            trailing_bytes: TrailingBytesPolicy::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ContractStateConfig::default();
        assert_eq!(config.user_prefix, b"u".to_vec());
        assert_eq!(config.trailing_bytes, TrailingBytesPolicy::Tolerate);
    }

    #[test]
    fn test_testing_config_rejects_trailing_bytes() {
        let config = ContractStateConfig::for_testing();
        assert_eq!(config.trailing_bytes, TrailingBytesPolicy::Reject);
    }
}
