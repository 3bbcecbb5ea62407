//! Thread-Local Table Cache
//!
//! # Lifecycle
//!
//! ```text
//! first call on a thread   → allocate (max_capacity storage)
//! later call, same config  → clear in place
//! later call, other config → drop and allocate
//! thread exit              → drop
//! ```
//!
//! The `thread_local!` key is created once per process by the runtime, and
//! a table never leaves the thread that created it.

use crate::domain::explorer::{
    AtomicExplorer, ExploreError, ExploreReport, ExploreRequest, TransitionOracle,
    VisibleSuccessor,
};
use crate::domain::table::{StateTable, TableConfig, TableError};
use std::cell::RefCell;
use tracing::debug;

thread_local! {
    static THREAD_TABLE: RefCell<Option<StateTable>> = const { RefCell::new(None) };
}

/// Thread-local table errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThreadCacheError {
    /// The thread's table is already borrowed by an enclosing call
    #[error("the thread-local state table is already in use on this thread")]
    InUse,

    /// The thread's table could not be created
    #[error(transparent)]
    Table(#[from] TableError),

    /// The session run on the thread's table failed
    #[error(transparent)]
    Explore(#[from] ExploreError),
}

/// Run `f` with this thread's table, cleared and configured as `config`
///
/// # Errors
///
/// - `ThreadCacheError::InUse` when called from inside another
///   `with_thread_table` on the same thread
/// - `ThreadCacheError::Table` with the error of `StateTable::new` when a
///   table has to be allocated
///
/// # Example
///
/// ```rust
/// use krepis_reach::domain::table::{Lookup, TableConfig};
/// use krepis_reach::infrastructure::thread_cache::with_thread_table;
///
/// let config = TableConfig::new(2);
/// let first = with_thread_table(config, |t| t.lookup_or_insert(&[1, 2])).unwrap();
/// // The next session starts from an empty table
/// let second = with_thread_table(config, |t| t.lookup_or_insert(&[1, 2])).unwrap();
/// assert_eq!((first, second), (Lookup::Inserted, Lookup::Inserted));
/// ```
pub fn with_thread_table<R, F>(config: TableConfig, f: F) -> Result<R, ThreadCacheError>
where
    F: FnOnce(&mut StateTable) -> R,
{
    THREAD_TABLE.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| ThreadCacheError::InUse)?;

        let table = match slot.take() {
            Some(mut table) if *table.config() == config => {
                table.clear();
                table
            }
            previous => {
                if let Some(old) = previous {
                    debug!(old = ?old.config(), new = ?config, "replacing thread table");
                }
                StateTable::new(config)?
            }
        };

        Ok(f(slot.insert(table)))
    })
}

/// Drop this thread's table now instead of at thread exit
///
/// Returns whether a table existed. A table in use by an enclosing
/// `with_thread_table` is left alone.
pub fn release_thread_table() -> bool {
    THREAD_TABLE.with(|cell| {
        cell.try_borrow_mut()
            .map(|mut slot| slot.take().is_some())
            .unwrap_or(false)
    })
}

impl AtomicExplorer {
    /// `explore` with this thread's cached table
    ///
    /// # Errors
    ///
    /// - `ThreadCacheError::Explore` for any error of `explore`
    /// - `ThreadCacheError::InUse` for reentrant use
    pub fn explore_on_thread<O, F>(
        &mut self,
        oracle: &O,
        request: ExploreRequest<'_>,
        config: TableConfig,
        sink: F,
    ) -> Result<ExploreReport, ThreadCacheError>
    where
        O: TransitionOracle + ?Sized,
        F: FnMut(VisibleSuccessor<'_>),
    {
        with_thread_table(config, |table| self.explore(table, oracle, request, sink))?
            .map_err(ThreadCacheError::from)
    }
}
