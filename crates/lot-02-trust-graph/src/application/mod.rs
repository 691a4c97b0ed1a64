//! # Application Module
//!
//! - `service`: exploration, merge serialization, selection
//! - `repository`: LRU cache of fetched records
//! - `preferences`: aliases and layout positions

pub mod preferences;
pub mod repository;
pub mod service;

pub use preferences::{NodePosition, NodePreferences};
pub use repository::{CachedUser, UserRepository};
pub use service::TrustGraphService;
