//! # Prefix-Keyed Sub-Maps
//!
//! A sub-map stores each entry at key `prefix ‖ text(identity)` with the value
//! encoded per field type. Decoding routes by exact byte prefix, recovers the
//! identity from the key suffix and decodes the value. One corrupt entry is
//! dropped and logged; it never aborts the rest of the dump.

use shared_types::{Identity, PendingRequest, TokenAmount};
use std::collections::BTreeMap;
use tracing::warn;

use super::codec::{read_f32_le, read_text, read_u64_le, write_text};
use crate::domain::{StateDecodeError, StateEntry};

/// Decode every entry whose key starts with `prefix`.
///
/// Keys without the prefix (including keys that are themselves a proper
/// prefix of `prefix`) are skipped silently. If two entries resolve to the
/// same identity, the later one wins.
pub fn decode_sub_map<V, D>(prefix: &[u8], decode_value: D, entries: &[StateEntry]) -> BTreeMap<Identity, V>
where
    D: Fn(&[u8]) -> Result<V, StateDecodeError>,
{
    let mut result = BTreeMap::new();

    for entry in entries {
        if !entry.key.starts_with(prefix) {
            continue;
        }

        let decoded = read_text(&entry.key, prefix.len())
            .and_then(|(id, _)| decode_value(&entry.value).map(|value| (Identity::new(id), value)));

        match decoded {
            Ok((id, value)) => {
                result.insert(id, value);
            }
            Err(e) => {
                warn!(
                    prefix = %hex::encode(prefix),
                    key = %hex::encode(&entry.key),
                    "[lot-01] Dropping sub-map entry: {}", e
                );
            }
        }
    }

    result
}

/// Build the storage key of a sub-map entry.
pub fn encode_sub_map_key(prefix: &[u8], id: &Identity) -> Vec<u8> {
    let mut key = prefix.to_vec();
    write_text(&mut key, id.as_str());
    key
}

// =============================================================================
// Value decoders
// =============================================================================

/// Profile text value.
pub fn decode_text_value(value: &[u8]) -> Result<String, StateDecodeError> {
    read_text(value, 0).map(|(text, _)| text)
}

/// Trust weight value.
pub fn decode_weight_value(value: &[u8]) -> Result<f32, StateDecodeError> {
    read_f32_le(value, 0).map(|(weight, _)| weight)
}

/// Token amount value (digit string).
pub fn decode_token_amount_value(value: &[u8]) -> Result<TokenAmount, StateDecodeError> {
    read_text(value, 0).map(|(digits, _)| TokenAmount::from_wire(digits))
}

/// Pending request value: deposit text then `u64` expiry.
pub fn decode_pending_request_value(value: &[u8]) -> Result<PendingRequest, StateDecodeError> {
    let (deposit, offset) = read_text(value, 0)?;
    let (expiry, _) = read_u64_le(value, offset)?;
    Ok(PendingRequest {
        deposit: TokenAmount::from_wire(deposit),
        expiry,
    })
}

// =============================================================================
// Named sub-maps
// =============================================================================

/// Private profile texts.
pub fn decode_profile_sub_map(prefix: &[u8], entries: &[StateEntry]) -> BTreeMap<Identity, String> {
    decode_sub_map(prefix, decode_text_value, entries)
}

/// Trust weights.
pub fn decode_trust_sub_map(prefix: &[u8], entries: &[StateEntry]) -> BTreeMap<Identity, f32> {
    decode_sub_map(prefix, decode_weight_value, entries)
}

/// Pending trust requests.
pub fn decode_pending_request_sub_map(
    prefix: &[u8],
    entries: &[StateEntry],
) -> BTreeMap<Identity, PendingRequest> {
    decode_sub_map(prefix, decode_pending_request_value, entries)
}

/// Deposits (accepted deposits, blocked-request deposits).
pub fn decode_deposit_sub_map(prefix: &[u8], entries: &[StateEntry]) -> BTreeMap<Identity, TokenAmount> {
    decode_sub_map(prefix, decode_token_amount_value, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::codec::{write_f32_le, write_u64_le};

    fn text_value(text: &str) -> Vec<u8> {
        let mut out = Vec::new();
        write_text(&mut out, text);
        out
    }

    fn weight_value(weight: f32) -> Vec<u8> {
        let mut out = Vec::new();
        write_f32_le(&mut out, weight);
        out
    }

    #[test]
    fn test_decode_profile_sub_map() {
        let prefix = b"pp_something";
        let entries = vec![
            StateEntry::new(encode_sub_map_key(prefix, &Identity::new("test")), text_value("abcd")),
            StateEntry::new(b"xx_something".to_vec(), vec![1, 0, 0, 0]),
        ];

        let map = decode_profile_sub_map(prefix, &entries);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Identity::new("test")).map(String::as_str), Some("abcd"));
    }

    #[test]
    fn test_decode_trust_sub_map() {
        let prefix = b"tn_someHashed";
        let entries = vec![
            StateEntry::new(encode_sub_map_key(prefix, &Identity::new("bob")), weight_value(0.5)),
            StateEntry::new(b"xx".to_vec(), b"yy".to_vec()),
        ];

        let map = decode_trust_sub_map(prefix, &entries);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&Identity::new("bob")], 0.5);
    }

    #[test]
    fn test_no_matching_prefix_yields_empty_map() {
        let entries = vec![StateEntry::new(b"ab".to_vec(), weight_value(1.0))];
        assert!(decode_trust_sub_map(b"tn_", &entries).is_empty());
    }

    #[test]
    fn test_key_that_is_proper_prefix_of_prefix_is_skipped() {
        // "tn" is a prefix of "tn_", but is not prefixed by it.
        let entries = vec![StateEntry::new(b"tn".to_vec(), weight_value(1.0))];
        assert!(decode_trust_sub_map(b"tn_", &entries).is_empty());
    }

    #[test]
    fn test_corrupt_entry_dropped_rest_kept() {
        let prefix = b"tn_";
        let mut bad_key = prefix.to_vec();
        bad_key.extend_from_slice(&[9, 0, 0, 0, b'x']);
        let entries = vec![
            StateEntry::new(bad_key, weight_value(1.0)),
            StateEntry::new(encode_sub_map_key(prefix, &Identity::new("short")), vec![0, 0]),
            StateEntry::new(encode_sub_map_key(prefix, &Identity::new("ok")), weight_value(0.25)),
        ];

        let map = decode_trust_sub_map(prefix, &entries);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&Identity::new("ok")], 0.25);
    }

    #[test]
    fn test_decode_pending_request_sub_map() {
        let prefix = b"rq_";
        let mut value = Vec::new();
        write_text(&mut value, "5000");
        write_u64_le(&mut value, 1_700_000_000_000);
        let entries = vec![StateEntry::new(encode_sub_map_key(prefix, &Identity::new("carol")), value)];

        let map = decode_pending_request_sub_map(prefix, &entries);
        let request = &map[&Identity::new("carol")];
        assert_eq!(request.deposit.as_str(), "5000");
        assert_eq!(request.expiry, 1_700_000_000_000);
    }

    #[test]
    fn test_pending_request_missing_expiry_dropped() {
        let prefix = b"rq_";
        let entries = vec![StateEntry::new(
            encode_sub_map_key(prefix, &Identity::new("carol")),
            text_value("5000"),
        )];
        assert!(decode_pending_request_sub_map(prefix, &entries).is_empty());
    }

    #[test]
    fn test_decode_deposit_sub_map() {
        let prefix = b"ad_";
        let entries = vec![StateEntry::new(
            encode_sub_map_key(prefix, &Identity::new("dave")),
            text_value("1000000000000000000000000"),
        )];
        let map = decode_deposit_sub_map(prefix, &entries);
        assert_eq!(map[&Identity::new("dave")].to_u128(), Some(10u128.pow(24)));
    }
}
