//! Table Pool - Explicit Per-Worker Tables
//!
//! An alternative to the thread-local cache for drivers that manage their
//! own workers: each worker identity owns at most one table, handed out
//! through an RAII guard and returned (and later cleared) on drop.
//!
//! # Architecture
//!
//! ```text
//! TablePool
//!   ├─ config: TableConfig
//!   └─ entries: DashMap<WorkerId, PoolEntry>
//!                 ├─ table: Option<StateTable>   (None while checked out)
//!                 ├─ checked_out: bool
//!                 └─ checkouts: u64
//!
//! checkout(w) ──▶ TableGuard ──(drop)──▶ release(w, table)
//! ```

use crate::domain::table::{StateTable, TableConfig, TableError};
use dashmap::DashMap;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use tracing::{debug, info, warn};

/// Worker identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl WorkerId {
    /// Create a new WorkerId
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw numeric ID
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Worker({})", self.0)
    }
}

/// Pool errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The worker already holds its table
    #[error("{0} already holds its state table")]
    InUse(WorkerId),

    /// A table could not be created
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Pool state at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// Workers with a table, idle or checked out
    pub tables: usize,
    /// Tables currently checked out
    pub checked_out: usize,
    /// Checkouts since the pool was created
    pub checkouts: u64,
}

#[derive(Default)]
struct PoolEntry {
    table: Option<StateTable>,
    checked_out: bool,
    checkouts: u64,
}

/// Per-worker state tables
pub struct TablePool {
    config: TableConfig,
    entries: DashMap<WorkerId, PoolEntry>,
}

impl TablePool {
    /// Create an empty pool; tables are allocated on first checkout
    ///
    /// # Errors
    ///
    /// The validation error of `config`, so a bad geometry fails here rather
    /// than on a worker.
    pub fn new(config: TableConfig) -> Result<Self, PoolError> {
        config.validate()?;
        info!(
            key_length = config.key_length,
            max_capacity = config.max_capacity(),
            "table pool initialized"
        );
        Ok(Self { config, entries: DashMap::new() })
    }

    /// Geometry of every table in the pool
    pub const fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Hand out `worker`'s table, empty
    ///
    /// # Errors
    ///
    /// - `PoolError::InUse` if `worker` has not returned its table yet
    /// - `PoolError::Table` if the table has to be allocated and cannot be
    pub fn checkout(&self, worker: WorkerId) -> Result<TableGuard<'_>, PoolError> {
        let mut entry = self.entries.entry(worker).or_default();
        if entry.checked_out {
            warn!(%worker, "table checked out twice");
            return Err(PoolError::InUse(worker));
        }

        let table = match entry.table.take() {
            Some(mut table) => {
                table.clear();
                table
            }
            None => {
                debug!(%worker, "allocating worker table");
                StateTable::new(self.config)?
            }
        };
        entry.checked_out = true;
        entry.checkouts += 1;

        Ok(TableGuard { table: ManuallyDrop::new(table), worker, pool: self })
    }

    /// Current counters
    pub fn snapshot(&self) -> PoolSnapshot {
        self.entries.iter().fold(PoolSnapshot::default(), |mut acc, entry| {
            if entry.table.is_some() || entry.checked_out {
                acc.tables += 1;
            }
            if entry.checked_out {
                acc.checked_out += 1;
            }
            acc.checkouts += entry.checkouts;
            acc
        })
    }

    /// Drop every idle table; returns how many were dropped
    ///
    /// Checked-out tables are dropped when their guard is.
    pub fn shutdown(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.checked_out);
        let dropped = before - self.entries.len();
        info!(dropped, "table pool shutdown");
        dropped
    }

    fn release(&self, worker: WorkerId, table: StateTable) {
        match self.entries.get_mut(&worker) {
            Some(mut entry) => {
                entry.table = Some(table);
                entry.checked_out = false;
            }
            None => debug!(%worker, "worker entry gone, dropping table"),
        }
    }
}

impl fmt::Debug for TablePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TablePool")
            .field("config", &self.config)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

/// Checked-out table; returned to the pool on drop
pub struct TableGuard<'a> {
    table: ManuallyDrop<StateTable>,
    worker: WorkerId,
    pool: &'a TablePool,
}

impl TableGuard<'_> {
    /// Owner of this table
    pub const fn worker(&self) -> WorkerId {
        self.worker
    }
}

impl fmt::Debug for TableGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableGuard")
            .field("worker", &self.worker)
            .field("table", &*self.table)
            .finish()
    }
}

impl Deref for TableGuard<'_> {
    type Target = StateTable;

    fn deref(&self) -> &StateTable {
        &self.table
    }
}

impl DerefMut for TableGuard<'_> {
    fn deref_mut(&mut self) -> &mut StateTable {
        &mut self.table
    }
}

impl Drop for TableGuard<'_> {
    fn drop(&mut self) {
        // SAFETY: `table` is taken exactly once, here, and never read again
        let table = unsafe { ManuallyDrop::take(&mut self.table) };
        self.pool.release(self.worker, table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Lookup;

    fn pool() -> TablePool {
        TablePool::new(TableConfig::new(2).initial(2).max(8)).unwrap()
    }

    #[test]
    fn test_checkout_reuses_and_clears() {
        let pool = pool();
        {
            let mut table = pool.checkout(WorkerId::new(0)).unwrap();
            assert_eq!(table.lookup_or_insert(&[1, 1]), Lookup::Inserted);
        }
        let mut table = pool.checkout(WorkerId::new(0)).unwrap();
        assert_eq!(table.load(), 0);
        assert_eq!(table.lookup_or_insert(&[1, 1]), Lookup::Inserted);
        drop(table);

        assert_eq!(pool.snapshot(), PoolSnapshot { tables: 1, checked_out: 0, checkouts: 2 });
    }

    #[test]
    fn test_double_checkout_is_rejected() {
        let pool = pool();
        let _held = pool.checkout(WorkerId::new(3)).unwrap();

        assert_eq!(pool.checkout(WorkerId::new(3)).unwrap_err(), PoolError::InUse(WorkerId::new(3)));
        assert!(pool.checkout(WorkerId::new(4)).is_ok());
    }

    #[test]
    fn test_shutdown_keeps_checked_out_tables() {
        let pool = pool();
        drop(pool.checkout(WorkerId::new(0)).unwrap());
        let held = pool.checkout(WorkerId::new(1)).unwrap();

        assert_eq!(pool.shutdown(), 1);
        assert_eq!(pool.snapshot().tables, 1);

        drop(held);
        assert_eq!(pool.snapshot().checked_out, 0);
    }

    #[test]
    fn test_table_returned_when_worker_panics() {
        let pool = pool();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut table = pool.checkout(WorkerId::new(5)).unwrap();
            let _ = table.lookup_or_insert(&[5, 5]);
            panic!("worker failed mid-session");
        }));
        assert!(result.is_err());
        assert_eq!(pool.snapshot(), PoolSnapshot { tables: 1, checked_out: 0, checkouts: 1 });

        let table = pool.checkout(WorkerId::new(5)).unwrap();
        assert!(table.is_empty());
        assert!(!table.contains(&[5, 5]));
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let err = TablePool::new(TableConfig::new(1).initial(5).max(5)).unwrap_err();
        assert!(matches!(err, PoolError::Table(TableError::InvalidCapacity { .. })));
    }
}
