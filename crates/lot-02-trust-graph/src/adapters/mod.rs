//! # Adapters Module
//!
//! In-process implementations of the outbound ports.

pub mod memory_preferences;

pub use memory_preferences::InMemoryPreferenceStore;
