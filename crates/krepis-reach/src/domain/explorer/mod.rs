//! Atomic Exploration
//!
//! # Overview
//!
//! When a model executes a transition that enters an atomic sequence, the
//! intermediate states of that sequence are invisible to the outer search.
//! This module computes the *atomic closure*: every state in which the
//! sequence ends, reported as a single step of the entering transition.
//!
//! # Architecture
//!
//! ```text
//! AtomicExplorer
//!   ├─ oracle: &dyn TransitionOracle   (generated model)
//!   ├─ table:  &mut StateTable         (seen-set, cleared per session)
//!   └─ sink:   FnMut(VisibleSuccessor) (outer search)
//! ```
//!
//! # Example
//!
//! ```rust
//! use krepis_reach::domain::explorer::{
//!     AtomicExplorer, Emit, ExploreRequest, ProcessId, TransitionGroup, TransitionOracle,
//! };
//! use krepis_reach::domain::table::{StateTable, TableConfig};
//!
//! /// Counter that leaves atomic once it reaches 3
//! struct Counter;
//!
//! impl TransitionOracle for Counter {
//!     fn state_size(&self) -> usize { 1 }
//!     fn initial_state(&self) -> Vec<i32> { vec![0] }
//!     fn successors_all(&self, s: &[i32], emit: &mut Emit<'_>) -> usize {
//!         self.successors_atomic(s, ProcessId::new(0), emit)
//!     }
//!     fn successors_atomic(&self, s: &[i32], _: ProcessId, emit: &mut Emit<'_>) -> usize {
//!         let group = if s[0] == 2 { 1 } else { 0 };
//!         emit(TransitionGroup::new(group), &[s[0] + 1]);
//!         1
//!     }
//!     fn leaves_atomic(&self, group: TransitionGroup) -> bool { group.as_usize() == 1 }
//! }
//!
//! let mut table = StateTable::new(TableConfig::new(1)).unwrap();
//! let mut reported = Vec::new();
//! let request = ExploreRequest::new(&[0], ProcessId::new(0), TransitionGroup::new(7));
//! let report = AtomicExplorer::new()
//!     .explore(&mut table, &Counter, request, |v| reported.push((v.group, v.state.to_vec())))
//!     .unwrap();
//!
//! assert_eq!(reported, vec![(TransitionGroup::new(7), vec![3])]);
//! assert_eq!(report.internal_states, 3);
//! ```

mod atomic;
mod display;
mod oracle;
mod types;

pub use atomic::AtomicExplorer;
pub use display::StateDisplay;
pub use oracle::{Emit, ModelIntrospection, TransitionOracle};
pub use types::{
    ExploreError, ExploreReport, ExploreRequest, ProcessId, TransitionGroup, VisibleSuccessor,
};
