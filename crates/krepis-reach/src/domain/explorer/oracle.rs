//! Model Interface
//!
//! The explorer never sees the model's code: it consumes the generated
//! transition function through `TransitionOracle` and, for diagnostics, the
//! naming tables through `ModelIntrospection`.
//!
//! # Successor Callback
//!
//! ```text
//! successors_atomic(state, process, emit)
//!     ├─ emit(group_a, succ_1)
//!     ├─ emit(group_b, succ_2)
//!     └─ returns 2
//! ```
//!
//! Successor slices are only valid for the duration of the `emit` call.

use super::types::{ProcessId, TransitionGroup};

/// Successor callback
pub type Emit<'e> = dyn FnMut(TransitionGroup, &[i32]) + 'e;

/// Generated transition function of a finite-state model
pub trait TransitionOracle {
    /// Slots per state vector
    fn state_size(&self) -> usize;

    /// Initial state (`state_size()` slots)
    fn initial_state(&self) -> Vec<i32>;

    /// Emit every successor of `state`; returns how many were emitted
    fn successors_all(&self, state: &[i32], emit: &mut Emit<'_>) -> usize;

    /// Emit the successors of `state` reachable by `process` while it holds
    /// the atomic lock; returns how many were emitted
    fn successors_atomic(&self, state: &[i32], process: ProcessId, emit: &mut Emit<'_>) -> usize;

    /// Whether a transition of `group` ends the atomic sequence
    fn leaves_atomic(&self, group: TransitionGroup) -> bool;
}

/// Naming tables of a model
///
/// Every method has a default, so a model only overrides what it knows.
/// A type with a value count of 0 is an integer range; its values print as
/// numbers.
pub trait ModelIntrospection {
    /// Name of state slot `slot`
    fn variable_name(&self, slot: usize) -> String {
        format!("slot_{slot}")
    }

    /// Type index of state slot `slot`
    fn variable_type(&self, _slot: usize) -> usize {
        0
    }

    /// Number of named values of type `ty` (0 for integer types)
    fn type_value_count(&self, _ty: usize) -> usize {
        0
    }

    /// Name of value `value` of type `ty`
    fn type_value_name(&self, _ty: usize, value: i32) -> String {
        value.to_string()
    }

    /// Name of transition group `group`
    fn group_name(&self, group: TransitionGroup) -> String {
        format!("group_{}", group.as_usize())
    }
}
