//! # Domain Module
//!
//! Core domain types for contract-state decoding.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
