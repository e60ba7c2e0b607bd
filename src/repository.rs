//! # State Repository
//!
//! Owns the state store and the axiom evaluator, and is the only place
//! states are created: it packs the initial state and applies ground
//! actions. `apply` is a pure function of its inputs — unconditional
//! effects on a copy of the fluent bitset, conditional effects judged
//! against the pre-state, numeric effects with amounts read from the
//! pre-state, then a fresh axiom closure and interning. Applying the
//! same action to the same state twice yields the same successor index.

use crate::axioms::AxiomEvaluator;
use crate::bitset::Bitset;
use crate::error::PlannerResult;
use crate::grounding::{
    eval_ground_expr, GroundAction, GroundSimpleEffect, Grounder, GroundNumericEffect,
};
use crate::pddl::ir::{FunctionKind, NumericOp, Problem};
use crate::state::{DenseState, State, StateStore};

pub struct StateRepository {
    store: StateStore,
    evaluator: AxiomEvaluator,
    statics: Bitset,
    /// Scratch buffers for one application; they never outlive a call.
    dense_pre: DenseState,
    dense_succ: DenseState,
}

impl StateRepository {
    pub fn new(problem: &Problem, evaluator: AxiomEvaluator) -> Self {
        let mut statics = Bitset::new();
        for &atom in &problem.initial_static_atoms {
            statics.set(atom as usize);
        }
        StateRepository {
            store: StateStore::new(),
            evaluator,
            statics,
            dense_pre: DenseState::new(),
            dense_succ: DenseState::new(),
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn statics(&self) -> &Bitset {
        &self.statics
    }

    pub fn unpack(&self, state: State, dense: &mut DenseState) {
        self.store.unpack(state, dense);
    }

    /// Ground the initial fluent and numeric assignments, close the
    /// derived atoms, and intern.
    pub fn initial_state(
        &mut self,
        problem: &mut Problem,
        grounder: &mut Grounder,
    ) -> PlannerResult<State> {
        self.dense_succ.clear();
        for &atom in &problem.initial_fluent_atoms {
            self.dense_succ.fluent.set(atom as usize);
        }
        self.dense_succ.numeric = problem.initial_values.clone();

        let statics = std::mem::take(&mut self.statics);
        let result =
            self.evaluator
                .evaluate(&mut self.dense_succ, problem, grounder, &statics);
        self.statics = statics;
        result?;

        self.store.intern(&self.dense_succ)
    }

    /// Apply a ground action, returning the successor and the action's
    /// cost in the pre-state (unit cost without a `total-cost` function).
    pub fn apply(
        &mut self,
        state: State,
        action: &GroundAction,
        problem: &mut Problem,
        grounder: &mut Grounder,
    ) -> PlannerResult<(State, f64)> {
        self.store.unpack(state, &mut self.dense_pre);

        self.dense_succ.clear();
        self.dense_succ.fluent.assign(&self.dense_pre.fluent);
        self.dense_succ.fluent.difference_with(&action.effect.delete);
        self.dense_succ.fluent.union_with(&action.effect.add);
        self.dense_succ.numeric = self.dense_pre.numeric.clone();

        let mut cost = 0.0f64;
        let mut has_cost_effect = false;

        for numeric in &action.effect.numerics {
            apply_numeric_effect(
                numeric,
                &self.dense_pre,
                &mut self.dense_succ,
                problem,
                &mut cost,
                &mut has_cost_effect,
            );
        }

        // Conditional effects are judged against the pre-state.
        for ce in &action.conditional_effects {
            if !ce.condition.holds(&self.dense_pre, &problem.static_values) {
                continue;
            }
            match ce.effect {
                GroundSimpleEffect::Literal { negated, atom } => {
                    if negated {
                        self.dense_succ.fluent.unset(atom as usize);
                    } else {
                        self.dense_succ.fluent.set(atom as usize);
                    }
                }
                GroundSimpleEffect::Numeric(numeric) => {
                    apply_numeric_effect(
                        &numeric,
                        &self.dense_pre,
                        &mut self.dense_succ,
                        problem,
                        &mut cost,
                        &mut has_cost_effect,
                    );
                }
            }
        }

        if problem.total_cost_function.is_none() {
            cost = 1.0;
        } else if !has_cost_effect {
            cost = 1.0;
        }

        self.dense_succ.derived.clear();
        let statics = std::mem::take(&mut self.statics);
        let result =
            self.evaluator
                .evaluate(&mut self.dense_succ, problem, grounder, &statics);
        self.statics = statics;
        result?;

        let successor = self.store.intern(&self.dense_succ)?;
        Ok((successor, cost))
    }

    /// Whether the action's precondition holds in a state. Used by the
    /// validation tests; the generators never yield inapplicable
    /// actions.
    pub fn is_applicable(&mut self, state: State, action: &GroundAction, problem: &Problem) -> bool {
        self.store.unpack(state, &mut self.dense_pre);
        action
            .precondition
            .holds(&self.dense_pre, &problem.static_values)
    }
}

fn apply_numeric_effect(
    effect: &GroundNumericEffect,
    pre: &DenseState,
    succ: &mut DenseState,
    problem: &Problem,
    cost: &mut f64,
    has_cost_effect: &mut bool,
) {
    let Some(amount) = eval_ground_expr(effect.amount, pre, &problem.static_values) else {
        return;
    };

    let (function, _) = problem.pool.fterms.get(effect.fterm);
    if problem.pool.functions[*function as usize].kind == FunctionKind::Auxiliary {
        // total-cost never enters the state; its increase is the cost.
        if effect.op == NumericOp::Increase {
            *cost += amount;
            *has_cost_effect = true;
        }
        return;
    }

    let current = pre.numeric_value(effect.fterm).unwrap_or(0.0);
    let updated = match effect.op {
        NumericOp::Assign => amount,
        NumericOp::Increase => current + amount,
        NumericOp::Decrease => current - amount,
    };
    if let Some(entry) = succ.numeric.iter_mut().find(|(f, _)| *f == effect.fterm) {
        entry.1 = updated;
    } else {
        succ.numeric.push((effect.fterm, updated));
    }
}
