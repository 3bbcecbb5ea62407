//! Table Lifecycle Across Threads
//!
//! Thread-local tables and pooled tables must never be shared between
//! concurrent sessions.

mod common;

use common::{node, GraphModel};
use krepis_reach::{
    release_thread_table, with_thread_table, AtomicExplorer, ExploreRequest, Lookup, PoolError,
    ProcessId, TableConfig, TablePool, TransitionGroup, WorkerId,
};
use parking_lot::Mutex;
use std::thread;

const WORKERS: usize = 8;

#[test]
fn test_thread_tables_are_isolated() {
    let config = TableConfig::new(2).initial(2).max(12);
    let results = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for worker in 0..WORKERS {
            let results = &results;
            scope.spawn(move || {
                let base = worker as i32 * 10_000;
                let inserted = with_thread_table(config, |t| {
                    (0..1000)
                        .filter(|i| t.lookup_or_insert(&[base + i, *i]) == Lookup::Inserted)
                        .count()
                })
                .unwrap();

                // The same keys are new again in the next session on this thread
                let again = with_thread_table(config, |t| {
                    t.lookup_or_insert(&[base, 0]) == Lookup::Inserted
                })
                .unwrap();

                assert!(release_thread_table());
                results.lock().push((worker, inserted, again));
            });
        }
    });

    let mut results = results.into_inner();
    results.sort_unstable();
    assert_eq!(results.len(), WORKERS);
    for (worker, inserted, again) in results {
        assert_eq!(inserted, 1000, "worker {worker}");
        assert!(again, "worker {worker}");
    }
}

#[test]
fn test_concurrent_sessions_on_thread_tables() {
    let model = GraphModel::new(3).internal(0, 1, 0).internal(1, 0, 1).leaving(1, 2, 2);
    let totals = Mutex::new(0usize);

    thread::scope(|scope| {
        for _ in 0..WORKERS {
            scope.spawn(|| {
                let mut explorer = AtomicExplorer::new();
                let root = node(0);
                for _ in 0..100 {
                    let request = ExploreRequest::new(&root, ProcessId::new(0), TransitionGroup::new(7));
                    let mut visible = 0;
                    explorer
                        .explore_on_thread(&model, request, TableConfig::new(2), |v| {
                            assert_eq!(v.state, node(2));
                            visible += 1;
                        })
                        .unwrap();
                    *totals.lock() += visible;
                }
            });
        }
    });

    assert_eq!(totals.into_inner(), WORKERS * 100);
}

#[test]
fn test_pool_hands_each_worker_its_own_table() {
    let pool = TablePool::new(TableConfig::new(1).initial(2).max(10)).unwrap();

    thread::scope(|scope| {
        for worker in 0..WORKERS {
            let pool = &pool;
            scope.spawn(move || {
                let id = WorkerId::new(worker);
                for round in 0..10 {
                    let mut table = pool.checkout(id).unwrap();
                    assert_eq!(table.load(), 0, "{id} round {round}");
                    for i in 0..200 {
                        assert_eq!(table.lookup_or_insert(&[i]), Lookup::Inserted);
                    }
                    assert_eq!(pool.checkout(id).unwrap_err(), PoolError::InUse(id));
                }
            });
        }
    });

    let snapshot = pool.snapshot();
    assert_eq!(snapshot.tables, WORKERS);
    assert_eq!(snapshot.checked_out, 0);
    assert_eq!(snapshot.checkouts, (WORKERS * 10) as u64);
    assert_eq!(pool.shutdown(), WORKERS);
}
