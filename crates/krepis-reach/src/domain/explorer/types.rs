//! Explorer Types
//!
//! Identifiers, session requests/reports and errors for atomic exploration.

use crate::domain::table::TableError;
use std::fmt;

/// Transition group identifier
///
/// Index into the model's list of transition groups. The explorer attaches
/// the group of the transition that *entered* the atomic sequence (the real
/// group) to every successor it reports.
///
/// # Example
///
/// ```rust
/// use krepis_reach::domain::explorer::TransitionGroup;
///
/// let group = TransitionGroup::new(3);
/// assert_eq!(group.as_usize(), 3);
/// assert_eq!(group.to_string(), "Group(3)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionGroup(pub usize);

impl TransitionGroup {
    /// Create a new TransitionGroup
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw index
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for TransitionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({})", self.0)
    }
}

/// Process identifier
///
/// Scopes successor generation inside an atomic sequence to the process that
/// holds the atomic lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Create a new ProcessId
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw index
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Process({})", self.0)
    }
}

/// One exploration session
#[derive(Debug, Clone, Copy)]
pub struct ExploreRequest<'a> {
    /// State reached by the transition that entered the atomic sequence
    pub state: &'a [i32],

    /// Process holding the atomic lock
    pub process: ProcessId,

    /// Group reported for every visible successor
    pub real_group: TransitionGroup,
}

impl<'a> ExploreRequest<'a> {
    /// Request exploring from `state` on behalf of `process`
    pub const fn new(state: &'a [i32], process: ProcessId, real_group: TransitionGroup) -> Self {
        Self { state, process, real_group }
    }
}

/// State handed to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleSuccessor<'a> {
    /// The session's real group
    pub group: TransitionGroup,

    /// End state of the atomic sequence
    pub state: &'a [i32],

    /// The sequence stopped because no atomic successor was enabled
    pub broken_atomicity: bool,
}

/// Session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExploreReport {
    /// Successors reported to the sink (including broken ones)
    pub visible: usize,

    /// States reported because atomicity was lost
    pub broken_atomicity: usize,

    /// Distinct states inserted into the seen-set
    pub internal_states: usize,
}

/// Exploration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExploreError {
    /// The seen-set could not be created or ran out of room
    #[error("atomic exploration failed: {0}")]
    Table(#[from] TableError),

    /// A state did not have the model's state size
    #[error("state has {actual} slots, model declares {expected}")]
    StateLength {
        /// Model state size
        expected: usize,
        /// Length received
        actual: usize,
    },
}
