//! # Breadth-First Search
//!
//! The substrate under IW and SIW: a FIFO open list over state indices,
//! parent/creating-action links in the node table, and an optional
//! novelty table that prunes successors whose atom tuples are all
//! already known. Resource bounds are checked before every pop.
//!
//! Outcome semantics: an empty frontier proves unsolvability only when
//! nothing was pruned and no bound was hit; otherwise the search merely
//! exhausted its budget.

use crate::error::PlannerResult;
use crate::novelty::NoveltyTable;
use crate::planner::SearchContext;
use crate::search::events::SearchEventHandler;
use crate::search::{NodeStatus, SearchNodeTable, SearchOptions, SearchResult, SearchStatus};
use crate::state::{DenseState, State};
use std::collections::VecDeque;
use std::time::Instant;

pub fn find_solution_brfs(
    ctx: &mut SearchContext,
    start: State,
    goal_test: &dyn Fn(&DenseState) -> bool,
    options: &SearchOptions,
    mut novelty: Option<&mut NoveltyTable>,
    event_handler: &mut dyn SearchEventHandler,
) -> PlannerResult<SearchResult> {
    let start_time = Instant::now();
    let mut nodes = SearchNodeTable::new();
    let mut queue: VecDeque<State> = VecDeque::new();
    let mut dense = DenseState::new();
    let mut applicable: Vec<u32> = Vec::new();

    event_handler.on_start_search();

    {
        let root = nodes.node(start.index);
        root.status = NodeStatus::Open;
        root.g_value = 0;
    }
    // The root is never pruned, but its tuples seed the table.
    if let Some(table) = novelty.as_deref_mut() {
        let atoms = ctx.fluent_atoms(start);
        table.test_novel(&atoms)?;
    }
    queue.push_back(start);

    let mut pruned_any = false;
    let mut current_layer = 0u32;

    loop {
        if let Some(timeout) = options.timeout {
            if start_time.elapsed() >= timeout {
                event_handler.on_end_search();
                return Ok(SearchResult::terminal(SearchStatus::TimedOut));
            }
        }
        if let Some(max_num_states) = options.max_num_states {
            if ctx.num_states() >= max_num_states {
                event_handler.on_exhausted();
                event_handler.on_end_search();
                return Ok(SearchResult::terminal(SearchStatus::Exhausted));
            }
        }

        let Some(state) = queue.pop_front() else {
            break;
        };

        let node = nodes.get(state.index);
        if node.g_value > current_layer {
            event_handler.on_finish_layer(current_layer);
            current_layer = node.g_value;
        }

        ctx.unpack(state, &mut dense);
        if goal_test(&dense) {
            let plan = nodes.extract_plan(state.index);
            event_handler.on_solved(plan.len());
            event_handler.on_end_search();
            return Ok(SearchResult {
                status: SearchStatus::Solved,
                plan: Some(plan),
                goal_state: Some(state.index),
            });
        }

        nodes.node(state.index).status = NodeStatus::Closed;
        event_handler.on_expand_state(state.index);

        ctx.applicable_actions(&dense, &mut applicable)?;
        for &action_id in &applicable {
            let (successor, cost) = ctx.apply(state, action_id)?;
            event_handler.on_generate_state(action_id, successor.index);

            if nodes.node(successor.index).status != NodeStatus::New {
                continue;
            }

            if let Some(table) = novelty.as_deref_mut() {
                let atoms = ctx.fluent_atoms(successor);
                if !table.test_novel(&atoms)? {
                    pruned_any = true;
                    nodes.node(successor.index).status = NodeStatus::Closed;
                    event_handler.on_prune_state(successor.index);
                    continue;
                }
            }

            let parent_g = nodes.get(state.index).g_value;
            let successor_node = nodes.node(successor.index);
            successor_node.status = NodeStatus::Open;
            successor_node.g_value = parent_g + 1;
            successor_node.parent = Some(state.index);
            successor_node.creating_action = Some(action_id);
            successor_node.action_cost = cost;
            queue.push_back(successor);
        }
    }

    event_handler.on_end_search();
    if pruned_any {
        event_handler.on_exhausted();
        Ok(SearchResult::terminal(SearchStatus::Exhausted))
    } else {
        event_handler.on_unsolvable();
        Ok(SearchResult::terminal(SearchStatus::Unsolvable))
    }
}
