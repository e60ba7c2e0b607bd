//! # Search Algorithms
//!
//! Breadth-first search as substrate, iterated width (IW) with k-ary
//! novelty pruning on top, and serialised iterated width (SIW) over a
//! goal decomposition. Plans are reconstructed by walking parent links
//! in the search-node table and reversing.
//!
//! Search outcomes are values, never errors: SOLVED carries a plan,
//! UNSOLVABLE means a complete search emptied its frontier, EXHAUSTED
//! means a pruned or bounded search gave up, TIMED_OUT speaks for
//! itself.

pub mod brfs;
pub mod events;
pub mod iw;
pub mod siw;

pub use brfs::find_solution_brfs;
pub use events::{EventMode, SearchEventHandler, SearchStatistics};
pub use iw::{find_solution_iw, IwOptions, IwResult, IwStatistics};
pub use siw::{find_solution_siw, SiwOptions, SiwResult, SiwStatistics};

use crate::bitset::Bitset;
use crate::pddl::ir::{GroundLiteral, Problem};
use crate::plan::Plan;
use crate::state::DenseState;
use std::time::Duration;

/// Terminal status of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Solved,
    Unsolvable,
    Exhausted,
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub plan: Option<Plan>,
    /// Index of the state the search stopped in, when SOLVED.
    pub goal_state: Option<u32>,
}

impl SearchResult {
    pub fn terminal(status: SearchStatus) -> Self {
        SearchResult {
            status,
            plan: None,
            goal_state: None,
        }
    }
}

/// Resource bounds shared by all algorithms; both are checked at the
/// top of every expansion loop.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub max_num_states: Option<usize>,
    pub timeout: Option<Duration>,
    pub event_mode: EventMode,
}

/// Per-search bookkeeping, indexed by state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    New,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchNode {
    pub status: NodeStatus,
    pub g_value: u32,
    pub parent: Option<u32>,
    pub creating_action: Option<u32>,
    pub action_cost: f64,
}

impl Default for SearchNode {
    fn default() -> Self {
        SearchNode {
            status: NodeStatus::New,
            g_value: 0,
            parent: None,
            creating_action: None,
            action_cost: 0.0,
        }
    }
}

/// Grow-on-demand node table keyed by state index.
#[derive(Debug, Default)]
pub struct SearchNodeTable {
    nodes: Vec<SearchNode>,
}

impl SearchNodeTable {
    pub fn new() -> Self {
        SearchNodeTable::default()
    }

    pub fn node(&mut self, state_index: u32) -> &mut SearchNode {
        let index = state_index as usize;
        if self.nodes.len() <= index {
            self.nodes.resize_with(index + 1, SearchNode::default);
        }
        &mut self.nodes[index]
    }

    pub fn get(&self, state_index: u32) -> SearchNode {
        self.nodes
            .get(state_index as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Follow parent links from `state_index` back to the root and
    /// reverse into a plan.
    pub fn extract_plan(&self, state_index: u32) -> Plan {
        let mut actions = Vec::new();
        let mut cost = 0.0;
        let mut current = self.get(state_index);
        while let (Some(parent), Some(action)) = (current.parent, current.creating_action) {
            actions.push(action);
            cost += current.action_cost;
            current = self.get(parent);
        }
        actions.reverse();
        Plan { actions, cost }
    }
}

/// Goal condition check against dense states, with the static part
/// discharged once at construction.
#[derive(Debug, Clone)]
pub struct GoalChecker {
    statically_satisfied: bool,
    fluents: Vec<GroundLiteral>,
    deriveds: Vec<GroundLiteral>,
}

impl GoalChecker {
    pub fn new(problem: &Problem, statics: &Bitset) -> Self {
        let statically_satisfied = problem
            .goal
            .statics
            .iter()
            .all(|literal| statics.get(literal.atom as usize) != literal.negated);
        GoalChecker {
            statically_satisfied,
            fluents: problem.goal.fluents.clone(),
            deriveds: problem.goal.deriveds.clone(),
        }
    }

    pub fn statically_satisfied(&self) -> bool {
        self.statically_satisfied
    }

    /// Number of goal literals not holding in `dense`.
    pub fn num_unachieved(&self, dense: &DenseState) -> usize {
        let fluents = self
            .fluents
            .iter()
            .filter(|l| dense.fluent.get(l.atom as usize) == l.negated)
            .count();
        let deriveds = self
            .deriveds
            .iter()
            .filter(|l| dense.derived.get(l.atom as usize) == l.negated)
            .count();
        fluents + deriveds
    }

    pub fn is_satisfied(&self, dense: &DenseState) -> bool {
        self.statically_satisfied && self.num_unachieved(dense) == 0
    }
}
