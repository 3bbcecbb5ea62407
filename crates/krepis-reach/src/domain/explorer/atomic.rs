//! AtomicExplorer - Atomic Closure Search
//!
//! # Algorithm
//!
//! ```text
//! explore(root):
//!     clear seen-set
//!     visit(root)
//!
//! visit(s):
//!     match seen.lookup_or_insert(s)
//!         Found    → return
//!         Full     → error
//!         Inserted → for (group, t) in successors_atomic(s):
//!                        if leaves_atomic(group): report(t)
//!                        else:                    visit(t)
//!                    if no successors: report(s, broken)
//! ```
//!
//! `visit` is driven by an explicit pending stack. The successors of a state
//! are pushed in reverse, so they are popped in oracle order and every
//! subtree finishes before its next sibling is looked at, which is the order
//! the recursive formulation reports in.
//!
//! # Physical Laws
//!
//! - **A-001**: Each distinct state is expanded at most once per session
//! - **A-002**: Every reported successor carries the session's real group
//! - **A-003**: Sessions terminate on cyclic atomic sequences

use super::oracle::TransitionOracle;
use super::types::{ExploreError, ExploreReport, ExploreRequest, TransitionGroup, VisibleSuccessor};
use crate::domain::table::{Lookup, StateTable};
use tracing::{debug, trace};

/// What to do with a popped state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    /// Reached through a leaves-atomic group: report it
    Visible,
    /// Still inside the atomic sequence: look it up and expand it
    Internal,
}

/// Reusable exploration buffers
///
/// One explorer can run any number of sessions; its buffers keep their
/// capacity between them.
#[derive(Debug, Default)]
pub struct AtomicExplorer {
    /// Kinds of pending states, top of stack last
    pending: Vec<Pending>,
    /// Pending states, `state_size` words each, parallel to `pending`
    words: Vec<i32>,
    /// State being processed
    current: Vec<i32>,
    /// Successors of `current`, in oracle order
    batch: Vec<Pending>,
    batch_words: Vec<i32>,
}

impl AtomicExplorer {
    /// Create an explorer with empty buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every visible end state of the atomic sequence starting at
    /// `request.state`
    ///
    /// `table` is cleared first and must have the model's key length.
    ///
    /// # Errors
    ///
    /// - `ExploreError::StateLength` if the root or any successor does not
    ///   have `oracle.state_size()` slots, or `table` has another key length
    /// - `ExploreError::Table(TableError::Full)` if the seen-set overflows
    pub fn explore<O, F>(
        &mut self,
        table: &mut StateTable,
        oracle: &O,
        request: ExploreRequest<'_>,
        mut sink: F,
    ) -> Result<ExploreReport, ExploreError>
    where
        O: TransitionOracle + ?Sized,
        F: FnMut(VisibleSuccessor<'_>),
    {
        let n = oracle.state_size();
        check_length(n, request.state.len())?;
        check_length(n, table.key_length())?;

        table.clear();
        self.pending.clear();
        self.words.clear();
        self.pending.push(Pending::Internal);
        self.words.extend_from_slice(request.state);

        trace!(process = %request.process, group = %request.real_group, "atomic session");

        let mut report = ExploreReport::default();
        while let Some(kind) = self.pending.pop() {
            let top = self.words.len() - n;
            self.current.clear();
            self.current.extend_from_slice(&self.words[top..]);
            self.words.truncate(top);

            if kind == Pending::Visible {
                sink(VisibleSuccessor {
                    group: request.real_group,
                    state: &self.current,
                    broken_atomicity: false,
                });
                report.visible += 1;
                continue;
            }

            match table.lookup_or_insert(&self.current) {
                Lookup::Found => continue,
                Lookup::Full => return Err(table.full_error().into()),
                Lookup::Inserted => report.internal_states += 1,
            }

            let count = self.expand(oracle, request)?;
            if count == 0 {
                debug!(
                    process = %request.process,
                    group = %request.real_group,
                    "atomicity lost: no enabled transition inside the atomic sequence"
                );
                sink(VisibleSuccessor {
                    group: request.real_group,
                    state: &self.current,
                    broken_atomicity: true,
                });
                report.visible += 1;
                report.broken_atomicity += 1;
            }
        }

        Ok(report)
    }

    /// Push the atomic successors of `current`; returns their number
    fn expand<O>(&mut self, oracle: &O, request: ExploreRequest<'_>) -> Result<usize, ExploreError>
    where
        O: TransitionOracle + ?Sized,
    {
        let n = self.current.len();
        self.batch.clear();
        self.batch_words.clear();

        let mut bad_length = None;
        let batch = &mut self.batch;
        let batch_words = &mut self.batch_words;
        let mut collect = |group: TransitionGroup, succ: &[i32]| {
            if succ.len() != n {
                bad_length.get_or_insert(succ.len());
                return;
            }
            batch.push(if oracle.leaves_atomic(group) {
                Pending::Visible
            } else {
                Pending::Internal
            });
            batch_words.extend_from_slice(succ);
        };
        oracle.successors_atomic(&self.current, request.process, &mut collect);

        if let Some(actual) = bad_length {
            return Err(ExploreError::StateLength { expected: n, actual });
        }

        // Indexed so zero-slot states keep one pending entry per successor
        for k in (0..self.batch.len()).rev() {
            self.pending.push(self.batch[k]);
            self.words.extend_from_slice(&self.batch_words[k * n..(k + 1) * n]);
        }
        Ok(self.batch.len())
    }
}

const fn check_length(expected: usize, actual: usize) -> Result<(), ExploreError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ExploreError::StateLength { expected, actual })
    }
}
