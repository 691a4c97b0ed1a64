//! # Contract State Service
//!
//! Turns a full storage dump into a typed `ContractStateSnapshot`: every fixed
//! user record joined with the sub-maps its headers point at.

use shared_types::TrustRelation;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::algorithms::{
    decode_deposit_sub_map, decode_pending_request_sub_map, decode_profile_sub_map,
    decode_trust_sub_map, decode_user_records,
};
use crate::config::ContractStateConfig;
use crate::domain::{
    ContractStateSnapshot, FixedRecord, StateDump, StateEntry, StateSourceError, UserState,
};
use crate::ports::StateDumpSource;

/// Contract State Service - decodes dumps into snapshots.
#[derive(Clone, Debug, Default)]
pub struct ContractStateService {
    config: ContractStateConfig,
}

impl ContractStateService {
    /// Create a new service.
    pub fn new(config: ContractStateConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ContractStateConfig {
        &self.config
    }

    /// Fetch a dump from `source` and decode it.
    ///
    /// Only a source failure is an error; undecodable entries are dropped.
    pub async fn load<S: StateDumpSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<ContractStateSnapshot, StateSourceError> {
        let dump = source.fetch_state().await?;
        info!(
            "[lot-01] Fetched {} storage entries from {}",
            dump.entries.len(),
            source.source_id()
        );
        Ok(self.decode_dump(&dump))
    }

    /// Decode a dump into a snapshot.
    pub fn decode_dump(&self, dump: &StateDump) -> ContractStateSnapshot {
        let fixed_records = decode_user_records(
            &dump.entries,
            &self.config.user_prefix,
            self.config.trailing_bytes,
        );

        let index = PrefixIndex::new(&dump.entries);
        let mut users = BTreeMap::new();
        for fixed in fixed_records {
            let state = assemble_user(fixed, &index);
            users.insert(state.record.id.clone(), state);
        }

        debug!("[lot-01] Decoded {} users", users.len());

        ContractStateSnapshot {
            block_height: dump.block_height,
            block_hash: dump.block_hash.clone(),
            users,
        }
    }
}

/// Dump entries ordered by key. Keys sharing a prefix form one contiguous
/// run, so each sub-map lookup is a binary search instead of a full scan.
struct PrefixIndex<'a> {
    sorted: Vec<(usize, &'a StateEntry)>,
}

impl<'a> PrefixIndex<'a> {
    fn new(entries: &'a [StateEntry]) -> Self {
        let mut sorted: Vec<_> = entries.iter().enumerate().collect();
        sorted.sort_by(|(_, a), (_, b)| a.key.cmp(&b.key));
        Self { sorted }
    }

    /// Entries whose key starts with `prefix`, in dump order. An empty prefix
    /// matches nothing.
    fn entries_with(&self, prefix: &[u8]) -> Vec<StateEntry> {
        if prefix.is_empty() {
            return Vec::new();
        }

        let start = self
            .sorted
            .partition_point(|(_, e)| e.key.as_slice() < prefix);
        let len = self.sorted[start..].partition_point(|(_, e)| e.key.starts_with(prefix));

        let mut matched = self.sorted[start..start + len].to_vec();
        matched.sort_by_key(|(position, _)| *position);
        matched.into_iter().map(|(_, e)| e.clone()).collect()
    }
}

/// Join a fixed record with its sub-maps. An empty header means the
/// sub-collection is empty (an empty prefix would match every key).
fn assemble_user(fixed: FixedRecord, index: &PrefixIndex<'_>) -> UserState {
    let FixedRecord { mut record, headers } = fixed;

    record.trust_relations = decode_trust_sub_map(&headers.trust, &index.entries_with(&headers.trust))
        .into_iter()
        .map(|(target, weight)| TrustRelation { target, weight })
        .collect();

    UserState {
        record,
        private_profile: decode_profile_sub_map(
            &headers.profile,
            &index.entries_with(&headers.profile),
        ),
        pending_requests: decode_pending_request_sub_map(
            &headers.pending_requests,
            &index.entries_with(&headers.pending_requests),
        ),
        deposits: decode_deposit_sub_map(&headers.deposits, &index.entries_with(&headers.deposits)),
    }
}
