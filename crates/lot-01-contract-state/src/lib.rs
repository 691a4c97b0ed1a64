//! # LOT-01 Contract State
//!
//! Decodes a raw key/value dump of the link-of-trust contract's storage into
//! typed records.
//!
//! **Subsystem ID:** 01  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Wire Layout
//!
//! | Item | Key | Value |
//! |------|-----|-------|
//! | Fixed user record | `user_prefix ‖ …` | identity, cost, profile (text) + 4 header blobs |
//! | Sub-map entry | `header ‖ text(identity)` | text / `f32` / text / text+`u64` |
//!
//! All integers and floats are little-endian; text and blobs carry a `u32`
//! length prefix.
//!
//! ## Module Structure
//!
//! ```text
//! lot-01-contract-state/
//! ├── domain/          # StateEntry, FixedRecord, snapshot types, errors
//! ├── algorithms/      # Binary codec, fixed-record and sub-map decoders
//! ├── ports/           # StateDumpSource (outbound)
//! ├── adapters/        # view_state JSON parsing, file source
//! ├── application/     # ContractStateService
//! └── config.rs        # ContractStateConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{parse_view_state, parse_view_state_str, ViewStateFileSource, ViewStateResult};
pub use algorithms::{
    decode_deposit_sub_map, decode_fixed_record, decode_fixed_record_with,
    decode_pending_request_sub_map, decode_profile_sub_map, decode_sub_map,
    decode_trust_sub_map, decode_user_records, encode_fixed_record, encode_sub_map_key,
};
pub use application::ContractStateService;
pub use config::{ContractStateConfig, TrailingBytesPolicy};
pub use domain::{
    ContractStateSnapshot, FixedRecord, StateDecodeError, StateDump, StateEntry,
    StateSourceError, SubMapHeaders, UserState,
};
pub use ports::{MockStateSource, StateDumpSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
