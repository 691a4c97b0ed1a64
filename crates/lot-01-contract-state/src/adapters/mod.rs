//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for storage dumps.

mod view_state;

pub use view_state::{
    parse_view_state, parse_view_state_str, ViewStateFileSource, ViewStateResult, ViewStateValue,
};
