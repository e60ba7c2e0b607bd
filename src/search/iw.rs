//! # Iterated Width
//!
//! Runs breadth-first search with k-ary novelty pruning, escalating the
//! arity from one up to a caller-supplied maximum until the goal
//! predicate is satisfied. The arity that solved the subproblem is its
//! effective width.

use crate::error::PlannerResult;
use crate::novelty::NoveltyTable;
use crate::planner::SearchContext;
use crate::search::events::{make_search_handler, SearchStatistics};
use crate::search::{find_solution_brfs, SearchOptions, SearchResult, SearchStatus};
use crate::state::{DenseState, State};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct IwOptions {
    pub start_arity: usize,
    pub max_arity: usize,
    pub search: SearchOptions,
}

impl Default for IwOptions {
    fn default() -> Self {
        IwOptions {
            start_arity: 1,
            max_arity: 1,
            search: SearchOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IwStatistics {
    pub brfs_statistics_by_arity: Vec<SearchStatistics>,
    /// The arity that solved the subproblem, if any.
    pub effective_width: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct IwResult {
    pub status: SearchStatus,
    pub plan: Option<crate::plan::Plan>,
    pub goal_state: Option<u32>,
    pub statistics: IwStatistics,
}

pub fn find_solution_iw(
    ctx: &mut SearchContext,
    start: State,
    goal_test: &dyn Fn(&DenseState) -> bool,
    options: &IwOptions,
) -> PlannerResult<IwResult> {
    let mut statistics = IwStatistics::default();

    for arity in options.start_arity..=options.max_arity {
        tracing::debug!(arity, "iterated width: starting arity");
        let mut event_handler = make_search_handler(options.search.event_mode);
        let mut novelty = NoveltyTable::new(arity);

        let result = find_solution_brfs(
            ctx,
            start,
            goal_test,
            &options.search,
            Some(&mut novelty),
            event_handler.as_mut(),
        )?;
        statistics
            .brfs_statistics_by_arity
            .push(event_handler.statistics().clone());

        match result.status {
            SearchStatus::Solved => {
                statistics.effective_width = Some(arity);
                return Ok(IwResult {
                    status: SearchStatus::Solved,
                    plan: result.plan,
                    goal_state: result.goal_state,
                    statistics,
                });
            }
            // A run that pruned nothing explored the whole reachable
            // space; escalating cannot help.
            SearchStatus::Unsolvable | SearchStatus::TimedOut => {
                return Ok(IwResult {
                    status: result.status,
                    plan: None,
                    goal_state: None,
                    statistics,
                });
            }
            SearchStatus::Exhausted => {}
        }
    }

    Ok(IwResult {
        status: SearchStatus::Exhausted,
        plan: None,
        goal_state: None,
        statistics,
    })
}

/// Convenience for plain IW against the problem goal.
pub fn find_solution_iw_for_goal(
    ctx: &mut SearchContext,
    options: &IwOptions,
) -> PlannerResult<IwResult> {
    let start = ctx.initial_state()?;
    let goal = ctx.goal_checker();
    if !goal.statically_satisfied() {
        return Ok(IwResult {
            status: SearchStatus::Unsolvable,
            plan: None,
            goal_state: None,
            statistics: IwStatistics::default(),
        });
    }
    let goal_test = move |dense: &DenseState| goal.is_satisfied(dense);
    find_solution_iw(ctx, start, &goal_test, options)
}

/// Convenience for plain breadth-first search against the problem goal.
pub fn find_solution_brfs_for_goal(
    ctx: &mut SearchContext,
    options: &SearchOptions,
) -> PlannerResult<SearchResult> {
    let start = ctx.initial_state()?;
    let goal = ctx.goal_checker();
    if !goal.statically_satisfied() {
        return Ok(SearchResult::terminal(SearchStatus::Unsolvable));
    }
    let goal_test = move |dense: &DenseState| goal.is_satisfied(dense);
    let mut event_handler = make_search_handler(options.event_mode);
    find_solution_brfs(ctx, start, &goal_test, options, None, event_handler.as_mut())
}
