//! # Shared Types Crate
//!
//! Value types that cross crate boundaries in the link-of-trust workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Identity`, `TokenAmount` and `UserRecord`
//!   are defined once here and used by both the storage decoder and the
//!   trust-graph engine.
//! - **Immutable Records**: a `UserRecord` is produced fresh by every fetch
//!   and never mutated in place.
//! - **No Floating Money**: token quantities stay digit strings end to end.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
