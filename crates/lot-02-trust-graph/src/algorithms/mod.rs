//! # Algorithms Module
//!
//! - `builder`: bounded depth-first traversal producing a snapshot
//! - `merger`: incremental merge of a snapshot into the accumulated graph

pub mod builder;
pub mod merger;

pub use builder::{fetch_many, TrustGraphBuilder};
pub use merger::merge;
