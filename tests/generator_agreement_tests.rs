//! The grounded and lifted applicable-action generators must agree on
//! every reachable state. The tests drive two contexts over the same
//! task in lockstep — action identity is compared by rendered name and
//! binding, since atom indices may be interned in different orders.

mod common;

use groundplan::plan::Plan;
use groundplan::search::EventMode;
use groundplan::state::State;
use groundplan::{SearchContext, PlannerResult};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

fn context(domain: &str, problem: &str, grounded: bool) -> SearchContext {
    let task = groundplan::load_task(domain, problem).unwrap();
    SearchContext::new(task, grounded, EventMode::Noop).unwrap()
}

fn rendered_applicable(ctx: &mut SearchContext, state: State) -> PlannerResult<BTreeSet<String>> {
    let ids = ctx.applicable_actions_of(state)?;
    Ok(ids
        .into_iter()
        .map(|id| Plan::render_action(&ctx.problem, &ctx.grounder, id))
        .collect())
}

/// Walk every reachable state of both contexts in lockstep, asserting
/// the applicable-action sets coincide. Returns the number of states
/// visited.
fn assert_generators_agree(domain: &str, problem: &str) -> usize {
    let mut grounded = context(domain, problem, true);
    let mut lifted = context(domain, problem, false);

    let start_g = grounded.initial_state().unwrap();
    let start_l = lifted.initial_state().unwrap();

    let mut visited: HashSet<u32> = HashSet::new();
    let mut queue: VecDeque<(State, State)> = VecDeque::new();
    visited.insert(start_g.index);
    queue.push_back((start_g, start_l));

    let mut num_states = 0;
    while let Some((state_g, state_l)) = queue.pop_front() {
        num_states += 1;

        let actions_g = rendered_applicable(&mut grounded, state_g).unwrap();
        let actions_l = rendered_applicable(&mut lifted, state_l).unwrap();
        assert_eq!(
            actions_g, actions_l,
            "generator disagreement at state {}",
            state_g.index
        );

        // Map rendered names back to ids in each context.
        let ids_g: HashMap<String, u32> = grounded
            .applicable_actions_of(state_g)
            .unwrap()
            .into_iter()
            .map(|id| (Plan::render_action(&grounded.problem, &grounded.grounder, id), id))
            .collect();
        let ids_l: HashMap<String, u32> = lifted
            .applicable_actions_of(state_l)
            .unwrap()
            .into_iter()
            .map(|id| (Plan::render_action(&lifted.problem, &lifted.grounder, id), id))
            .collect();

        for name in &actions_g {
            let (succ_g, _) = grounded.apply(state_g, ids_g[name]).unwrap();
            let (succ_l, _) = lifted.apply(state_l, ids_l[name]).unwrap();
            if visited.insert(succ_g.index) {
                queue.push_back((succ_g, succ_l));
            }
        }
    }
    num_states
}

#[test]
fn test_gripper_generators_agree_everywhere() {
    let num_states = assert_generators_agree(common::GRIPPER_DOMAIN, common::GRIPPER_P_1_0);
    assert!(num_states > 4, "expected a non-trivial reachable space");
}

#[test]
fn test_ferry_generators_agree_everywhere() {
    assert_generators_agree(common::FERRY_DOMAIN, common::FERRY_TEST);
}

#[test]
fn test_axiom_task_generators_agree_everywhere() {
    assert_generators_agree(common::TOWER_AXIOM_DOMAIN, common::TOWER_AXIOM_TEST);
}

#[test]
fn test_grounded_generation_is_memoised() {
    let mut ctx = context(common::GRIPPER_DOMAIN, common::GRIPPER_P_1_0, false);
    let start = ctx.initial_state().unwrap();
    let first = ctx.applicable_actions_of(start).unwrap();
    let second = ctx.applicable_actions_of(start).unwrap();
    // Grounding the same (schema, binding) twice returns the same index.
    assert_eq!(first, second);
}

#[test]
fn test_delete_relaxed_universe_covers_lifted_reachability() {
    // Every action the lifted path ever deems applicable must appear in
    // the grounded (delete-relaxed) universe.
    let mut grounded = context(common::GRIPPER_DOMAIN, common::GRIPPER_P_1_0, true);
    let universe: BTreeSet<String> = (0..grounded.grounder.num_actions() as u32)
        .map(|id| Plan::render_action(&grounded.problem, &grounded.grounder, id))
        .collect();

    let mut lifted = context(common::GRIPPER_DOMAIN, common::GRIPPER_P_1_0, false);
    let start = lifted.initial_state().unwrap();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start.index);
    queue.push_back(start);
    while let Some(state) = queue.pop_front() {
        for id in lifted.applicable_actions_of(state).unwrap() {
            let name = Plan::render_action(&lifted.problem, &lifted.grounder, id);
            assert!(
                universe.contains(&name),
                "{name} applicable but missing from the relaxed universe"
            );
            let (successor, _) = lifted.apply(state, id).unwrap();
            if visited.insert(successor.index) {
                queue.push_back(successor);
            }
        }
    }
}
