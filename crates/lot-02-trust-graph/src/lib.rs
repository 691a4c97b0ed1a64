//! # LOT-02 Trust Graph Sync
//!
//! Builds a bounded view of the trust network around one participant and
//! folds successive views into one accumulated graph.
//!
//! **Subsystem ID:** 02  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Exploration Flow
//!
//! ```text
//! explore(start, depth)
//!   │
//!   ├─ issue generation N
//!   ├─ TrustGraphBuilder: DFS over weight > 0 relations, one fetch per identity
//!   │     └─ UserRepository notified per added node
//!   ├─ lock graph, drop result if generation N is no longer the latest
//!   └─ merge(accumulated, snapshot): refresh overlaps, retract stale edges
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! lot-02-trust-graph/
//! ├── domain/          # TrustNode, TrustEdge, TrustGraph, VisitedSet, errors
//! ├── algorithms/      # builder (traversal), merger
//! ├── ports/           # TrustGraphApi (inbound), UserFetcher, NodeObserver, PreferenceStore
//! ├── adapters/        # In-memory preference store
//! ├── application/     # TrustGraphService, UserRepository, NodePreferences
//! └── config.rs        # TrustGraphConfig
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
pub use adapters::InMemoryPreferenceStore;
pub use algorithms::{fetch_many, merge, TrustGraphBuilder};
pub use application::{
    CachedUser, NodePosition, NodePreferences, TrustGraphService, UserRepository,
};
pub use config::TrustGraphConfig;
pub use domain::{
    PreferenceError, TrustEdge, TrustGraph, TrustGraphError, TrustNode, VisitedSet,
    DEFAULT_DEPTH,
};
pub use ports::{
    MockUserFetcher, NodeObserver, PreferenceStore, TrustGraphApi, UserDirectory, UserFetcher,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
