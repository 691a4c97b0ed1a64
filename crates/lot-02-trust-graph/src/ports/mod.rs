//! # Ports Module
//!
//! Hexagonal architecture ports (interfaces).
//!
//! - `inbound`: API trait for trust-graph exploration
//! - `outbound`: record fetching, identity listing, fetch observation, preference storage

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
