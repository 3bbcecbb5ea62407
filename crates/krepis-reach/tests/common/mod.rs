//! Shared fixtures for the integration tests

#![allow(dead_code)]

use krepis_reach::{Emit, ModelIntrospection, ProcessId, TransitionGroup, TransitionOracle};

/// Node `n` is the state `[n, 10 * n]`
pub fn node(n: i32) -> [i32; 2] {
    [n, 10 * n]
}

/// Explicit graph model
///
/// Every edge carries its own transition group; `leaving[g]` marks groups
/// that end an atomic sequence. Atomic successors are the edges whose
/// `process` matches the requested one.
#[derive(Debug, Default)]
pub struct GraphModel {
    /// (from, to, group, process)
    pub edges: Vec<(i32, i32, usize, usize)>,
    pub leaving: Vec<bool>,
}

impl GraphModel {
    pub fn new(groups: usize) -> Self {
        Self { edges: Vec::new(), leaving: vec![false; groups] }
    }

    /// Edge of process 0 that stays inside atomicity
    pub fn internal(mut self, from: i32, to: i32, group: usize) -> Self {
        self.edges.push((from, to, group, 0));
        self
    }

    /// Edge of process 0 that leaves atomicity
    pub fn leaving(mut self, from: i32, to: i32, group: usize) -> Self {
        self.edges.push((from, to, group, 0));
        self.leaving[group] = true;
        self
    }

    /// Edge of another process
    pub fn foreign(mut self, from: i32, to: i32, group: usize, process: usize) -> Self {
        self.edges.push((from, to, group, process));
        self
    }

    fn emit_from(&self, state: &[i32], process: Option<usize>, emit: &mut Emit<'_>) -> usize {
        let mut count = 0;
        for &(from, to, group, owner) in &self.edges {
            if state[0] == from && process.map_or(true, |p| p == owner) {
                emit(TransitionGroup::new(group), &node(to));
                count += 1;
            }
        }
        count
    }
}

impl TransitionOracle for GraphModel {
    fn state_size(&self) -> usize {
        2
    }

    fn initial_state(&self) -> Vec<i32> {
        node(0).to_vec()
    }

    fn successors_all(&self, state: &[i32], emit: &mut Emit<'_>) -> usize {
        self.emit_from(state, None, emit)
    }

    fn successors_atomic(&self, state: &[i32], process: ProcessId, emit: &mut Emit<'_>) -> usize {
        self.emit_from(state, Some(process.as_usize()), emit)
    }

    fn leaves_atomic(&self, group: TransitionGroup) -> bool {
        self.leaving[group.as_usize()]
    }
}

impl ModelIntrospection for GraphModel {
    fn variable_name(&self, slot: usize) -> String {
        ["node", "shadow"][slot].to_string()
    }
}

/// `len`-slot key with every slot set to `i`
pub fn repeated(i: i32, len: usize) -> Vec<i32> {
    vec![i; len]
}
