//! # Outbound Ports
//!
//! Traits for external dependencies (storage dump sources).

use crate::domain::{StateDump, StateSourceError};
use async_trait::async_trait;

/// Source of full contract storage dumps - outbound port.
///
/// Implementations must be read-only; timeouts and retries are theirs.
#[async_trait]
pub trait StateDumpSource: Send + Sync {
    /// Fetch every `(key, value)` pair currently stored by the contract.
    async fn fetch_state(&self) -> Result<StateDump, StateSourceError>;

    /// Source identifier (for logging/debugging).
    fn source_id(&self) -> &str;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock state source for testing.
#[derive(Clone, Debug)]
pub struct MockStateSource {
    /// Source identifier.
    pub id: String,
    /// Dump returned by `fetch_state`.
    pub dump: StateDump,
    /// Should return errors?
    pub should_fail: bool,
}

impl Default for MockStateSource {
    fn default() -> Self {
        Self {
            id: "mock-state-1".to_string(),
            dump: StateDump::default(),
            should_fail: false,
        }
    }
}

impl MockStateSource {
    /// Mock serving `dump`.
    pub fn with_dump(dump: StateDump) -> Self {
        Self {
            dump,
            ..Default::default()
        }
    }
}

#[async_trait]
impl StateDumpSource for MockStateSource {
    async fn fetch_state(&self) -> Result<StateDump, StateSourceError> {
        if self.should_fail {
            return Err(StateSourceError::Unavailable("Mock failure".to_string()));
        }
        Ok(self.dump.clone())
    }

    fn source_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StateEntry;

    #[tokio::test]
    async fn test_mock_source_returns_dump() {
        let source = MockStateSource::with_dump(StateDump::from_entries(vec![StateEntry::new(
            b"k".to_vec(),
            b"v".to_vec(),
        )]));
        let dump = source.fetch_state().await.unwrap();
        assert_eq!(dump.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_source_failure() {
        let source = MockStateSource {
            should_fail: true,
            ..Default::default()
        };
        assert!(matches!(
            source.fetch_state().await,
            Err(StateSourceError::Unavailable(_))
        ));
    }
}
