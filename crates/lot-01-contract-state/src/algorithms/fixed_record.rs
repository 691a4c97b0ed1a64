//! # Fixed Record Decoding
//!
//! Per-identity record layout, strictly in this order:
//!
//! 1. identity (text)
//! 2. requested trust cost (text, digit string)
//! 3. public profile (text)
//! 4. four length-prefixed header blobs: profile, trust, pending requests,
//!    deposits
//!
//! The headers are not expanded here: the sub-collections they describe live
//! at separate keys (see [`super::sub_map`]).

use shared_types::{Identity, TokenAmount, UserRecord};
use tracing::{debug, warn};

use super::codec::{read_bytes, read_text, write_bytes, write_text};
use crate::config::TrailingBytesPolicy;
use crate::domain::{FixedRecord, StateDecodeError, StateEntry, SubMapHeaders};

/// Decode the scalar fields of a fixed record, tolerating trailing bytes.
pub fn decode_fixed_record(value: &[u8]) -> Result<UserRecord, StateDecodeError> {
    decode_fixed_record_with(value, TrailingBytesPolicy::Tolerate).map(|fixed| fixed.record)
}

/// Decode a fixed record and its sub-collection headers.
pub fn decode_fixed_record_with(
    value: &[u8],
    policy: TrailingBytesPolicy,
) -> Result<FixedRecord, StateDecodeError> {
    let (id, offset) = read_text(value, 0)?;
    let (cost, offset) = read_text(value, offset)?;
    let (profile, offset) = read_text(value, offset)?;
    let (profile_header, offset) = read_bytes(value, offset)?;
    let (trust_header, offset) = read_bytes(value, offset)?;
    let (pending_header, offset) = read_bytes(value, offset)?;
    let (deposit_header, offset) = read_bytes(value, offset)?;

    let remaining = value.len() - offset;
    if remaining > 0 {
        match policy {
            TrailingBytesPolicy::Tolerate => {
                debug!("[lot-01] Ignoring {} trailing bytes after record {}", remaining, id);
            }
            TrailingBytesPolicy::Reject => {
                return Err(StateDecodeError::TrailingBytes {
                    consumed: offset,
                    remaining,
                });
            }
        }
    }

    Ok(FixedRecord {
        record: UserRecord::new(Identity::new(id), TokenAmount::from_wire(cost), profile),
        headers: SubMapHeaders {
            profile: profile_header,
            trust: trust_header,
            pending_requests: pending_header,
            deposits: deposit_header,
        },
    })
}

/// Encode a fixed record in storage layout. Relations are not part of the
/// fixed layout and are ignored.
pub fn encode_fixed_record(record: &UserRecord, headers: &SubMapHeaders) -> Vec<u8> {
    let mut out = Vec::new();
    write_text(&mut out, record.id.as_str());
    write_text(&mut out, record.requested_trust_cost.as_str());
    write_text(&mut out, &record.profile);
    write_bytes(&mut out, &headers.profile);
    write_bytes(&mut out, &headers.trust);
    write_bytes(&mut out, &headers.pending_requests);
    write_bytes(&mut out, &headers.deposits);
    out
}

/// Decode every entry under `user_prefix` as a fixed record.
///
/// Entries that fail to decode are logged and dropped; the scan continues.
pub fn decode_user_records(
    entries: &[StateEntry],
    user_prefix: &[u8],
    policy: TrailingBytesPolicy,
) -> Vec<FixedRecord> {
    let mut records = Vec::new();
    for entry in entries.iter().filter(|e| e.key.starts_with(user_prefix)) {
        match decode_fixed_record_with(&entry.value, policy) {
            Ok(fixed) => records.push(fixed),
            Err(e) => {
                warn!(
                    key = %hex::encode(&entry.key),
                    "[lot-01] Dropping undecodable user record: {}", e
                );
            }
        }
    }
    records
}
