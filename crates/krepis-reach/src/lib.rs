//! Krepis Reach - Atomic State Exploration Core
//!
//! # Overview
//!
//! `krepis-reach` is the state-space exploration core used behind generated
//! transition functions. Given a model that produces successor states through
//! a callback, it enumerates the externally visible successors of a state,
//! collapsing chains of atomic transitions into a single visible step.
//!
//! # Trinity Architecture
//!
//! This crate follows the Trinity Architecture pattern:
//!
//! - **Domain**: hashing, the state table, the atomic explorer and the
//!   dependency matrices
//! - **Infrastructure**: thread-local table storage
//! - **Adapters**: the per-worker table pool
//!
//! # Physical Laws (Invariants)
//!
//! ## Table Laws
//! - **H-001**: No false negatives - a member key is never reported new
//! - **H-002**: Bounded load - inserts never push load past 75% of capacity
//! - **H-003**: Bounded memory - storage is allocated once, at max capacity
//!
//! ## Exploration Laws
//! - **A-001**: Termination - every atomic closure visits each state once
//! - **A-002**: Real group - every visible successor carries the group that
//!   entered the closure
//! - **A-003**: No silent deadlock - a closure that stops inside atomicity is
//!   reported and flagged
//!
//! # Usage
//!
//! ```rust
//! use krepis_reach::domain::table::{Lookup, StateTable, TableConfig};
//!
//! let mut table = StateTable::new(TableConfig::new(3).initial(2).max(10)).unwrap();
//!
//! assert_eq!(table.lookup_or_insert(&[1, 2, 3]), Lookup::Inserted);
//! assert_eq!(table.lookup_or_insert(&[1, 2, 3]), Lookup::Found);
//!
//! table.clear();
//! assert_eq!(table.lookup_or_insert(&[1, 2, 3]), Lookup::Inserted);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// Trinity Architecture Layers
pub mod domain;
pub mod infrastructure;
pub mod adapters;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Re-export Primary Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// Hashing
pub use domain::fingerprint::{hash_bytes, hash_state};

// State table
pub use domain::table::{Lookup, StateTable, TableConfig, TableError, TableStats};

// Exploration
pub use domain::explorer::{
    AtomicExplorer,
    Emit,
    ExploreError,
    ExploreReport,
    ExploreRequest,
    ModelIntrospection,
    ProcessId,
    StateDisplay,
    TransitionGroup,
    TransitionOracle,
    VisibleSuccessor,
};

// Dependency matrices
pub use domain::matrix::{
    dependency_listing,
    DependencyInput,
    DependencyMatrices,
    DependencyMatrix,
    MatrixError,
    MatrixKind,
    MatrixView,
};

// Table lifecycle
pub use adapters::pool::{PoolError, PoolSnapshot, TableGuard, TablePool, WorkerId};
pub use infrastructure::thread_cache::{release_thread_table, with_thread_table, ThreadCacheError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
