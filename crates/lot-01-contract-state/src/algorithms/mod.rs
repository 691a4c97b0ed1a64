//! # Algorithms Module
//!
//! Binary codec and the decoders built on it.

pub mod codec;
pub mod fixed_record;
pub mod sub_map;

pub use codec::{
    read_bytes, read_f32_le, read_text, read_u32_le, read_u64_le, write_bytes, write_f32_le,
    write_text, write_u32_le, write_u64_le,
};
pub use fixed_record::{
    decode_fixed_record, decode_fixed_record_with, decode_user_records, encode_fixed_record,
};
pub use sub_map::{
    decode_deposit_sub_map, decode_pending_request_sub_map, decode_pending_request_value,
    decode_profile_sub_map, decode_sub_map, decode_text_value, decode_token_amount_value,
    decode_trust_sub_map, decode_weight_value, encode_sub_map_key,
};
