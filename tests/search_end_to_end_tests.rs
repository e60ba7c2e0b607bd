//! End-to-end search scenarios over the classic benchmark instances:
//! gripper with SIW, blocksworld with BrFS and IW, visitall arity
//! escalation, spanner dead ends, and the plan file format.

mod common;

use groundplan::search::{EventMode, SearchOptions};
use groundplan::{IwOptions, Planner, SearchStatus, SiwOptions};
use std::io::Write;

fn planner(domain: &str, problem: &str, grounded: bool) -> Planner {
    Planner::from_text(domain, problem, grounded, EventMode::Noop).unwrap()
}

fn quiet_search() -> SearchOptions {
    SearchOptions {
        event_mode: EventMode::Noop,
        ..SearchOptions::default()
    }
}

/// Apply a plan from the initial state and check it reaches the goal.
fn assert_plan_valid(planner: &mut Planner, plan: &groundplan::Plan) {
    let ctx = planner.context();
    let goal = ctx.goal_checker();
    let mut state = ctx.initial_state().unwrap();
    for &action_id in &plan.actions {
        let applicable = ctx.applicable_actions_of(state).unwrap();
        assert!(
            applicable.contains(&action_id),
            "plan action is not applicable in its state"
        );
        let (successor, _) = ctx.apply(state, action_id).unwrap();
        state = successor;
    }
    let mut dense = groundplan::DenseState::new();
    ctx.unpack(state, &mut dense);
    assert!(goal.is_satisfied(&dense), "plan does not reach the goal");
}

#[test]
fn test_gripper_siw_finds_three_step_plan() {
    for grounded in [false, true] {
        let mut planner = planner(common::GRIPPER_DOMAIN, common::GRIPPER_P_1_0, grounded);
        let options = SiwOptions {
            max_arity: 2,
            search: quiet_search(),
        };
        let result = planner.solve_siw(&options).unwrap();
        assert_eq!(result.status, SearchStatus::Solved, "grounded={grounded}");

        let plan = result.plan.unwrap();
        assert_eq!(plan.len(), 3, "pick, move, drop");
        assert_plan_valid(&mut planner, &plan);

        let rendered = planner.render_plan(&plan);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("(pick ball1 rooma"));
        assert_eq!(lines[1], "(move rooma roomb)");
        assert!(lines[2].starts_with("(drop ball1 roomb"));

        // The single subproblem needs pairs of atoms to stay novel.
        assert!(result.statistics.maximum_effective_width() <= Some(2));
    }
}

#[test]
fn test_blocks_brfs_and_iw_find_shortest_plan() {
    let mut brfs_planner = planner(common::BLOCKS_DOMAIN, common::BLOCKS_4, true);
    let brfs = brfs_planner.solve_brfs(&quiet_search()).unwrap();
    assert_eq!(brfs.status, SearchStatus::Solved);
    let brfs_plan = brfs.plan.unwrap();
    assert!(brfs_plan.len() <= 6);
    assert_plan_valid(&mut brfs_planner, &brfs_plan);

    let mut iw_planner = planner(common::BLOCKS_DOMAIN, common::BLOCKS_4, true);
    let iw = iw_planner
        .solve_iw(&IwOptions {
            start_arity: 1,
            max_arity: 2,
            search: quiet_search(),
        })
        .unwrap();
    assert_eq!(iw.status, SearchStatus::Solved);
    let iw_plan = iw.plan.unwrap();
    assert!(iw_plan.len() <= brfs_plan.len());
    assert_plan_valid(&mut iw_planner, &iw_plan);
}

#[test]
fn test_visitall_needs_width_three() {
    // One-atom novelty starves after the first arm; pairs die at the
    // second return to the hub. Arities below three exhaust.
    let mut narrow = planner(common::VISITALL_DOMAIN, common::VISITALL_STAR, true);
    let result = narrow
        .solve_iw(&IwOptions {
            start_arity: 1,
            max_arity: 2,
            search: quiet_search(),
        })
        .unwrap();
    assert_eq!(result.status, SearchStatus::Exhausted);

    // Triples keep the two-arms-visited hub states alive.
    let mut wide = planner(common::VISITALL_DOMAIN, common::VISITALL_STAR, true);
    let result = wide
        .solve_iw(&IwOptions {
            start_arity: 1,
            max_arity: 3,
            search: quiet_search(),
        })
        .unwrap();
    assert_eq!(result.status, SearchStatus::Solved);
    assert_eq!(result.statistics.effective_width, Some(3));
    let plan = result.plan.unwrap();
    assert_eq!(plan.len(), 5, "arm, back, arm, back, arm");
    assert_plan_valid(&mut wide, &plan);
}

#[test]
fn test_spanner_dead_end_is_unsolvable() {
    let mut solvable = planner(common::SPANNER_DOMAIN, common::SPANNER_SOLVABLE, true);
    let result = solvable.solve_brfs(&quiet_search()).unwrap();
    assert_eq!(result.status, SearchStatus::Solved);
    let plan = result.plan.unwrap();
    assert_eq!(plan.len(), 4, "walk, pickup, walk, tighten");

    // Once past the spanner, every branch is absorbing; the complete
    // search proves unsolvability.
    let mut dead = planner(common::SPANNER_DOMAIN, common::SPANNER_DEAD_END, true);
    let result = dead.solve_brfs(&quiet_search()).unwrap();
    assert_eq!(result.status, SearchStatus::Unsolvable);
    assert!(result.plan.is_none());

    let mut dead_siw = planner(common::SPANNER_DOMAIN, common::SPANNER_DEAD_END, false);
    let result = dead_siw
        .solve_siw(&SiwOptions {
            max_arity: 2,
            search: quiet_search(),
        })
        .unwrap();
    assert_eq!(result.status, SearchStatus::Unsolvable);
}

#[test]
fn test_axiom_goal_solved_through_derived_closure() {
    for grounded in [false, true] {
        let mut planner = planner(common::TOWER_AXIOM_DOMAIN, common::TOWER_AXIOM_TEST, grounded);
        let result = planner.solve_brfs(&quiet_search()).unwrap();
        assert_eq!(result.status, SearchStatus::Solved, "grounded={grounded}");
        let plan = result.plan.unwrap();
        assert_eq!(plan.len(), 1, "one move reaches (above a other)");
        assert_plan_valid(&mut planner, &plan);
    }
}

#[test]
fn test_max_num_states_bounds_the_search() {
    let mut planner = planner(common::BLOCKS_DOMAIN, common::BLOCKS_4, true);
    let options = SearchOptions {
        max_num_states: Some(1),
        event_mode: EventMode::Noop,
        ..SearchOptions::default()
    };
    let result = planner.solve_brfs(&options).unwrap();
    assert_eq!(result.status, SearchStatus::Exhausted);
    assert!(result.plan.is_none());
}

#[test]
fn test_plan_file_roundtrip() {
    let mut planner = planner(common::GRIPPER_DOMAIN, common::GRIPPER_P_1_0, true);
    let result = planner
        .solve_siw(&SiwOptions {
            max_arity: 2,
            search: quiet_search(),
        })
        .unwrap();
    let plan = result.plan.unwrap();
    let rendered = planner.render_plan(&plan);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(rendered.as_bytes()).unwrap();
    let read_back = std::fs::read_to_string(file.path()).unwrap();

    // One `(name obj ...)` per line, no header.
    assert_eq!(read_back.lines().count(), plan.len());
    for line in read_back.lines() {
        assert!(line.starts_with('(') && line.ends_with(')'));
    }
}

#[test]
fn test_apply_is_pure() {
    let mut planner = planner(common::GRIPPER_DOMAIN, common::GRIPPER_P_1_0, true);
    let ctx = planner.context();
    let start = ctx.initial_state().unwrap();
    let action = ctx.applicable_actions_of(start).unwrap()[0];

    let (first, first_cost) = ctx.apply(start, action).unwrap();
    let (second, second_cost) = ctx.apply(start, action).unwrap();
    assert_eq!(first.index, second.index);
    assert_eq!(first_cost, second_cost);
}
