//! Atomic Explorer - End-to-End Sessions
//!
//! Graph models with explicit atomic and leaving transitions, explored with
//! caller-owned tables, the thread cache and the worker pool.

mod common;

use common::{node, GraphModel};
use krepis_reach::{
    AtomicExplorer, ExploreError, ExploreReport, ExploreRequest, ProcessId, StateDisplay,
    StateTable, TableConfig, TableError, TablePool, ThreadCacheError, TransitionGroup,
    TransitionOracle, WorkerId,
};

const REAL_GROUP: TransitionGroup = TransitionGroup::new(99);

/// Visible successors as (state, broken) pairs
fn explore_all(
    model: &GraphModel,
    root: i32,
    config: TableConfig,
) -> (Result<ExploreReport, ExploreError>, Vec<(Vec<i32>, bool)>) {
    let mut table = StateTable::new(config).unwrap();
    let mut visible = Vec::new();
    let root = node(root);
    let request = ExploreRequest::new(&root, ProcessId::new(0), REAL_GROUP);

    let result = AtomicExplorer::new().explore(&mut table, model, request, |succ| {
        assert_eq!(succ.group, REAL_GROUP);
        visible.push((succ.state.to_vec(), succ.broken_atomicity));
    });
    (result, visible)
}

/// A(0) → B(1) → C(2) with B → A; only B → C leaves atomicity
fn cycle_model() -> GraphModel {
    GraphModel::new(3).internal(0, 1, 0).internal(1, 0, 1).leaving(1, 2, 2)
}

#[test]
fn test_cycle_terminates_with_single_visible_successor() {
    let (result, visible) = explore_all(&cycle_model(), 0, TableConfig::new(2));

    assert_eq!(visible, vec![(node(2).to_vec(), false)]);
    let report = result.unwrap();
    assert_eq!(report.visible, 1);
    assert_eq!(report.broken_atomicity, 0);
    assert_eq!(report.internal_states, 2);
}

#[test]
fn test_loss_of_atomicity_reports_dead_end() {
    // A → B → D, D has no successors
    let model = GraphModel::new(2).internal(0, 1, 0).internal(1, 3, 1);
    let (result, visible) = explore_all(&model, 0, TableConfig::new(2));

    assert_eq!(visible, vec![(node(3).to_vec(), true)]);
    let report = result.unwrap();
    assert_eq!(report.visible, 1);
    assert_eq!(report.broken_atomicity, 1);
}

#[test]
fn test_root_without_successors_is_reported_itself() {
    let (result, visible) = explore_all(&GraphModel::new(1), 5, TableConfig::new(2));

    assert_eq!(visible, vec![(node(5).to_vec(), true)]);
    assert_eq!(result.unwrap().internal_states, 1);
}

#[test]
fn test_same_visible_state_reported_per_path() {
    // Two leaving edges into the same state are two visible steps
    let model = GraphModel::new(3).internal(0, 1, 0).leaving(0, 4, 1).leaving(1, 4, 2);
    let (result, visible) = explore_all(&model, 0, TableConfig::new(2));

    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|(s, broken)| *s == node(4) && !broken));
    assert_eq!(result.unwrap().visible, 2);
}

#[test]
fn test_successors_reported_in_callback_order() {
    // 0 → {1, 2} internal; 1 → 10, 2 → 20, 0 → 30 leaving
    let model = GraphModel::new(6)
        .internal(0, 1, 0)
        .internal(0, 2, 1)
        .leaving(0, 30, 2)
        .leaving(1, 10, 3)
        .leaving(2, 20, 4);
    let (_, visible) = explore_all(&model, 0, TableConfig::new(2));

    let order: Vec<i32> = visible.iter().map(|(s, _)| s[0]).collect();
    assert_eq!(order, vec![10, 20, 30]);
}

#[test]
fn test_other_processes_do_not_step_inside_atomicity() {
    let model = GraphModel::new(3).internal(0, 1, 0).leaving(1, 2, 1).foreign(0, 7, 2, 1);
    let (_, visible) = explore_all(&model, 0, TableConfig::new(2));

    assert_eq!(visible, vec![(node(2).to_vec(), false)]);
}

#[test]
fn test_long_internal_chain_grows_the_table() {
    let mut model = GraphModel::new(2000);
    for n in 0..1999 {
        model = model.internal(n, n + 1, n as usize);
    }
    model = model.leaving(1999, 5000, 1999);

    let (result, visible) = explore_all(&model, 0, TableConfig::new(2).initial(2).max(12));

    assert_eq!(visible, vec![(node(5000).to_vec(), false)]);
    assert_eq!(result.unwrap().internal_states, 2000);
}

#[test]
fn test_overflow_is_a_typed_error() {
    let mut model = GraphModel::new(100);
    for n in 0..99 {
        model = model.internal(n, n + 1, n as usize);
    }

    let (result, _) = explore_all(&model, 0, TableConfig::new(2).initial(2).max(5));
    let err = result.unwrap_err();

    assert_eq!(err, ExploreError::Table(TableError::Full { max_capacity_pow2: 5, load: 24 }));
    assert!(err.to_string().contains("2^5"));
}

#[test]
fn test_sessions_are_independent() {
    let model = cycle_model();
    let mut table = StateTable::new(TableConfig::new(2)).unwrap();
    let mut explorer = AtomicExplorer::new();
    let root = node(0);

    for _ in 0..3 {
        let mut count = 0;
        let request = ExploreRequest::new(&root, ProcessId::new(0), REAL_GROUP);
        let report = explorer.explore(&mut table, &model, request, |_| count += 1).unwrap();
        assert_eq!(count, 1);
        assert_eq!(report.internal_states, 2);
    }
}

#[test]
fn test_wrong_table_geometry_is_rejected() {
    let mut table = StateTable::new(TableConfig::new(3)).unwrap();
    let root = node(0);
    let request = ExploreRequest::new(&root, ProcessId::new(0), REAL_GROUP);

    let err = AtomicExplorer::new().explore(&mut table, &cycle_model(), request, |_| {}).unwrap_err();
    assert_eq!(err, ExploreError::StateLength { expected: 2, actual: 3 });
}

#[test]
fn test_explore_on_thread_matches_owned_table() {
    let model = cycle_model();
    let root = node(0);
    let request = ExploreRequest::new(&root, ProcessId::new(0), REAL_GROUP);
    let mut explorer = AtomicExplorer::new();

    let mut visible = Vec::new();
    let report = explorer
        .explore_on_thread(&model, request, TableConfig::new(2), |s| visible.push(s.state.to_vec()))
        .unwrap();

    assert_eq!(visible, vec![node(2).to_vec()]);
    assert_eq!(report.internal_states, 2);
}

#[test]
fn test_nested_thread_session_is_rejected() {
    let model = cycle_model();
    let root = node(0);
    let request = ExploreRequest::new(&root, ProcessId::new(0), REAL_GROUP);
    let config = TableConfig::new(2);

    let mut inner = None;
    AtomicExplorer::new()
        .explore_on_thread(&model, request, config, |succ| {
            let nested = ExploreRequest::new(succ.state, ProcessId::new(0), REAL_GROUP);
            inner = Some(AtomicExplorer::new().explore_on_thread(&model, nested, config, |_| {}));
        })
        .unwrap();

    assert_eq!(inner, Some(Err(ThreadCacheError::InUse)));
}

#[test]
fn test_outer_search_over_pool_tables() {
    // Outer breadth-first search: every step that enters atomicity (group 0)
    // is collapsed with the explorer
    let model = GraphModel::new(4)
        .internal(0, 1, 0)
        .internal(1, 2, 1)
        .leaving(2, 3, 2)
        .leaving(3, 0, 3);
    let pool = TablePool::new(TableConfig::new(2)).unwrap();
    let mut explorer = AtomicExplorer::new();

    let mut seen = vec![model.initial_state()];
    let mut frontier = vec![model.initial_state()];
    while let Some(state) = frontier.pop() {
        let mut steps: Vec<(TransitionGroup, Vec<i32>)> = Vec::new();
        model.successors_all(&state, &mut |group: TransitionGroup, succ: &[i32]| {
            steps.push((group, succ.to_vec()));
        });

        for (group, succ) in steps {
            let mut visible = vec![succ.clone()];
            if !model.leaves_atomic(group) {
                visible.clear();
                let mut table = pool.checkout(WorkerId::new(0)).unwrap();
                let request = ExploreRequest::new(&succ, ProcessId::new(0), group);
                explorer
                    .explore(&mut table, &model, request, |v| {
                        assert_eq!(v.group, group);
                        visible.push(v.state.to_vec());
                    })
                    .unwrap();
            }
            for s in visible {
                if !seen.contains(&s) {
                    seen.push(s.clone());
                    frontier.push(s);
                }
            }
        }
    }

    seen.sort();
    assert_eq!(seen, vec![node(0).to_vec(), node(3).to_vec()]);
    assert_eq!(pool.snapshot().checkouts, 1);
}

#[test]
fn test_state_display_uses_model_names() {
    let text = StateDisplay::new(&cycle_model(), &node(4)).to_string();
    assert!(text.contains("node"));
    assert!(text.contains("=  40"));
}
