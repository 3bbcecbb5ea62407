//! Domain Layer - Exploration Core
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   successors    ┌──────────────────────┐
//! │ TransitionOracle │ ──────────────▶ │ AtomicExplorer       │
//! │ (generated model)│   (callback)    │ - pending stack      │
//! └──────────────────┘                 │ - real_group         │
//!                                      └──────────┬───────────┘
//!                                                 │ lookup_or_insert
//!                                      ┌──────────▼───────────┐
//!                                      │ StateTable           │
//!                                      │ - fingerprint lines  │
//!                                      │ - key payloads       │
//!                                      └──────────┬───────────┘
//!                                                 │ hash_state
//!                                      ┌──────────▼───────────┐
//!                                      │ fingerprint          │
//!                                      └──────────────────────┘
//! ```
//!
//! The dependency matrices are independent of exploration: they are derived
//! once from the static read/write/guard information of a model.
//!
//! # Example
//!
//! ```rust
//! use krepis_reach::domain::fingerprint::hash_state;
//!
//! let h0 = hash_state(&[4, 2], 0);
//! let h1 = hash_state(&[4, 2], h0);
//! assert_eq!(h0, hash_state(&[4, 2], 0));
//! assert_ne!(h0, h1);
//! ```

pub mod fingerprint;
pub mod table;
pub mod explorer;
pub mod matrix;

pub use fingerprint::{hash_bytes, hash_state};
pub use table::{Lookup, StateTable, TableConfig, TableError, TableStats};
pub use explorer::{
    AtomicExplorer, Emit, ExploreError, ExploreReport, ExploreRequest, ModelIntrospection,
    ProcessId, StateDisplay, TransitionGroup, TransitionOracle, VisibleSuccessor,
};
pub use matrix::{
    dependency_listing, DependencyInput, DependencyMatrices, DependencyMatrix, Dimension,
    GroupDependencies, GuardDependencies, MatrixError, MatrixKind, MatrixView,
};
