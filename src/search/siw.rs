//! # Serialised Iterated Width
//!
//! Decomposes the goal into a sequence of subproblems: from the current
//! state, run IW with the predicate "the set of unachieved goal
//! literals strictly shrinks", adopt the resulting state, repeat until
//! the full goal holds. Terminates with UNSOLVABLE as soon as one IW
//! call exhausts, since later subproblems cannot repair an earlier
//! failure.

use crate::error::PlannerResult;
use crate::plan::Plan;
use crate::planner::SearchContext;
use crate::search::iw::{find_solution_iw, IwOptions, IwStatistics};
use crate::search::{SearchOptions, SearchStatus};
use crate::state::DenseState;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct SiwOptions {
    /// Maximum IW arity per subproblem.
    pub max_arity: usize,
    pub search: SearchOptions,
}

impl Default for SiwOptions {
    fn default() -> Self {
        SiwOptions {
            max_arity: 1,
            search: SearchOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SiwStatistics {
    pub iw_statistics_by_subproblem: Vec<IwStatistics>,
}

impl SiwStatistics {
    pub fn maximum_effective_width(&self) -> Option<usize> {
        self.iw_statistics_by_subproblem
            .iter()
            .filter_map(|s| s.effective_width)
            .max()
    }

    pub fn average_effective_width(&self) -> Option<f64> {
        let widths: Vec<usize> = self
            .iw_statistics_by_subproblem
            .iter()
            .filter_map(|s| s.effective_width)
            .collect();
        if widths.is_empty() {
            return None;
        }
        Some(widths.iter().sum::<usize>() as f64 / widths.len() as f64)
    }
}

#[derive(Debug, Clone)]
pub struct SiwResult {
    pub status: SearchStatus,
    pub plan: Option<Plan>,
    pub statistics: SiwStatistics,
}

pub fn find_solution_siw(
    ctx: &mut SearchContext,
    options: &SiwOptions,
) -> PlannerResult<SiwResult> {
    let mut statistics = SiwStatistics::default();
    let goal = ctx.goal_checker();
    if !goal.statically_satisfied() {
        return Ok(SiwResult {
            status: SearchStatus::Unsolvable,
            plan: None,
            statistics,
        });
    }

    let mut current = ctx.initial_state()?;
    let mut plan = Plan::default();
    let mut dense = DenseState::new();

    loop {
        ctx.unpack(current, &mut dense);
        let unachieved = goal.num_unachieved(&dense);
        if unachieved == 0 {
            tracing::info!(
                plan_length = plan.len(),
                subproblems = statistics.iw_statistics_by_subproblem.len(),
                "serialised iterated width solved the task"
            );
            return Ok(SiwResult {
                status: SearchStatus::Solved,
                plan: Some(plan),
                statistics,
            });
        }

        tracing::debug!(unachieved, "starting subproblem");
        let subgoal = goal.clone();
        let goal_test =
            move |dense: &DenseState| subgoal.num_unachieved(dense) < unachieved;
        let iw_options = IwOptions {
            start_arity: 1,
            max_arity: options.max_arity,
            search: options.search.clone(),
        };
        let result = find_solution_iw(ctx, current, &goal_test, &iw_options)?;
        statistics.iw_statistics_by_subproblem.push(result.statistics);

        match result.status {
            SearchStatus::Solved => {
                let subplan = result.plan.unwrap_or_default();
                plan.actions.extend(subplan.actions);
                plan.cost += subplan.cost;
                let goal_state = result
                    .goal_state
                    .expect("a solved subproblem carries its goal state");
                current = ctx.state(goal_state);
            }
            SearchStatus::TimedOut => {
                return Ok(SiwResult {
                    status: SearchStatus::TimedOut,
                    plan: None,
                    statistics,
                });
            }
            SearchStatus::Unsolvable | SearchStatus::Exhausted => {
                // A failed subproblem dooms the serialisation.
                return Ok(SiwResult {
                    status: SearchStatus::Unsolvable,
                    plan: None,
                    statistics,
                });
            }
        }
    }
}
