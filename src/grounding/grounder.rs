//! # Grounder
//!
//! Turns `(schema, binding)` pairs into ground actions and ground
//! axioms, memoising every level: ground literals per lifted literal
//! (keyed by the binding subsequence the literal actually uses), and
//! whole ground elements per `(schema, binding)`. The first insertion of
//! a pair assigns its dense index; repeated grounding calls return the
//! same index forever after.
//!
//! Static preconditions are discharged here: a binding that violates
//! them produces no ground element at all, so downstream consumers only
//! ever see fluent/derived/numeric obligations.
//!
//! Construction-time the grounder also runs the delete-relaxed
//! pre-exploration ([`delete_relaxed_explore`]): ignoring delete effects
//! and negative conditions, fire everything until fixpoint. The ground
//! elements discovered bound real reachability and form the match-tree
//! universe for the grounded generators.

use crate::bitset::Bitset;
use crate::error::{PlannerError, PlannerResult};
use crate::grounding::assignment_set::AssignmentSet;
use crate::grounding::bindings::{BindingGenerator, EvalContext};
use crate::pddl::ir::{
    ActionSchema, AxiomSchema, ConjunctiveCondition, ConjunctiveEffect, FunctionKind,
    GroundLiteral, IrPool, Kind, NumericExpr, PerKind, Problem, Term,
};
use crate::state::DenseState;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;

/// Ground numeric term: a constant or an interned ground function term.
#[derive(Debug, Clone, Copy)]
pub enum GroundNumericExpr {
    Constant(f64),
    Fterm(u32),
}

impl PartialEq for GroundNumericExpr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GroundNumericExpr::Constant(a), GroundNumericExpr::Constant(b)) => {
                a.to_bits() == b.to_bits()
            }
            (GroundNumericExpr::Fterm(a), GroundNumericExpr::Fterm(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for GroundNumericExpr {}

impl std::hash::Hash for GroundNumericExpr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            GroundNumericExpr::Constant(value) => {
                0u8.hash(state);
                value.to_bits().hash(state);
            }
            GroundNumericExpr::Fterm(fterm) => {
                1u8.hash(state);
                fterm.hash(state);
            }
        }
    }
}

/// Ground numeric constraint, usable as a match-tree split key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroundNumericConstraint {
    pub op: crate::pddl::ir::CompareOp,
    pub lhs: GroundNumericExpr,
    pub rhs: GroundNumericExpr,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundNumericEffect {
    pub op: crate::pddl::ir::NumericOp,
    pub fterm: u32,
    pub amount: GroundNumericExpr,
}

/// Strips-style ground condition: positive/negative bitsets over the
/// fluent and derived atom universes plus ground numeric constraints.
/// Static literals were already discharged.
#[derive(Debug, Clone, Default)]
pub struct GroundCondition {
    pub fluent_pos: Bitset,
    pub fluent_neg: Bitset,
    pub derived_pos: Bitset,
    pub derived_neg: Bitset,
    pub numerics: Vec<GroundNumericConstraint>,
}

impl GroundCondition {
    /// Truth in a dense state; numeric constraints consult the state
    /// tuple first, then the fixed static values.
    pub fn holds(&self, dense: &DenseState, static_values: &[(u32, f64)]) -> bool {
        self.fluent_pos.is_subset_of(&dense.fluent)
            && self.fluent_neg.is_disjoint_with(&dense.fluent)
            && self.derived_pos.is_subset_of(&dense.derived)
            && self.derived_neg.is_disjoint_with(&dense.derived)
            && self.numerics.iter().all(|constraint| {
                eval_ground_constraint(constraint, dense, static_values).unwrap_or(false)
            })
    }

    /// Relaxed truth: positive parts only.
    pub fn holds_relaxed(&self, dense: &DenseState) -> bool {
        self.fluent_pos.is_subset_of(&dense.fluent)
            && self.derived_pos.is_subset_of(&dense.derived)
    }

    /// Whether the condition mentions the given atom at all.
    pub fn mentions(&self, kind: Kind, atom: u32) -> bool {
        match kind {
            Kind::Fluent => {
                self.fluent_pos.get(atom as usize) || self.fluent_neg.get(atom as usize)
            }
            Kind::Derived => {
                self.derived_pos.get(atom as usize) || self.derived_neg.get(atom as usize)
            }
            Kind::Static => false,
        }
    }
}

pub fn eval_ground_expr(
    expr: GroundNumericExpr,
    dense: &DenseState,
    static_values: &[(u32, f64)],
) -> Option<f64> {
    match expr {
        GroundNumericExpr::Constant(value) => Some(value),
        GroundNumericExpr::Fterm(fterm) => dense.numeric_value(fterm).or_else(|| {
            static_values
                .iter()
                .find(|(f, _)| *f == fterm)
                .map(|(_, v)| *v)
        }),
    }
}

fn eval_ground_constraint(
    constraint: &GroundNumericConstraint,
    dense: &DenseState,
    static_values: &[(u32, f64)],
) -> Option<bool> {
    let lhs = eval_ground_expr(constraint.lhs, dense, static_values)?;
    let rhs = eval_ground_expr(constraint.rhs, dense, static_values)?;
    Some(constraint.op.eval(lhs, rhs))
}

/// Unconditional ground effect: delete/add bitsets plus numeric effects.
#[derive(Debug, Clone, Default)]
pub struct GroundEffect {
    pub add: Bitset,
    pub delete: Bitset,
    pub numerics: Vec<GroundNumericEffect>,
}

/// The single effect of a ground conditional effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundSimpleEffect {
    Literal { negated: bool, atom: u32 },
    Numeric(GroundNumericEffect),
}

#[derive(Debug, Clone)]
pub struct GroundConditionalEffect {
    pub condition: GroundCondition,
    pub effect: GroundSimpleEffect,
}

/// A ground action: schema, binding, discharged precondition, effects.
#[derive(Debug, Clone)]
pub struct GroundAction {
    pub index: u32,
    pub schema: u32,
    pub binding: Vec<u32>,
    pub precondition: GroundCondition,
    pub effect: GroundEffect,
    pub conditional_effects: Vec<GroundConditionalEffect>,
}

/// A ground axiom: discharged body and a single derived head atom.
#[derive(Debug, Clone)]
pub struct GroundAxiom {
    pub index: u32,
    pub schema: u32,
    pub binding: Vec<u32>,
    pub precondition: GroundCondition,
    pub head: u32,
}

/// Grounder cache counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GrounderStatistics {
    pub action_cache_hits: u64,
    pub action_cache_misses: u64,
    pub axiom_cache_hits: u64,
    pub axiom_cache_misses: u64,
    /// Bindings rejected because a static precondition failed.
    pub num_statically_inapplicable: u64,
}

/// Observer surface for the grounder.
pub trait GrounderEventHandler {
    fn on_action_cache_hit(&mut self) {}
    fn on_action_cache_miss(&mut self) {}
    fn on_axiom_cache_hit(&mut self) {}
    fn on_axiom_cache_miss(&mut self) {}
    fn on_statically_inapplicable(&mut self) {}
    fn statistics(&self) -> &GrounderStatistics;
}

/// Counts silently.
#[derive(Debug, Default)]
pub struct DefaultGrounderEventHandler {
    statistics: GrounderStatistics,
}

impl GrounderEventHandler for DefaultGrounderEventHandler {
    fn on_action_cache_hit(&mut self) {
        self.statistics.action_cache_hits += 1;
    }
    fn on_action_cache_miss(&mut self) {
        self.statistics.action_cache_misses += 1;
    }
    fn on_axiom_cache_hit(&mut self) {
        self.statistics.axiom_cache_hits += 1;
    }
    fn on_axiom_cache_miss(&mut self) {
        self.statistics.axiom_cache_misses += 1;
    }
    fn on_statically_inapplicable(&mut self) {
        self.statistics.num_statically_inapplicable += 1;
    }
    fn statistics(&self) -> &GrounderStatistics {
        &self.statistics
    }
}

/// Counts and traces every miss.
#[derive(Debug, Default)]
pub struct DebugGrounderEventHandler {
    statistics: GrounderStatistics,
}

impl GrounderEventHandler for DebugGrounderEventHandler {
    fn on_action_cache_hit(&mut self) {
        self.statistics.action_cache_hits += 1;
    }
    fn on_action_cache_miss(&mut self) {
        self.statistics.action_cache_misses += 1;
        tracing::trace!("grounded a new action");
    }
    fn on_axiom_cache_hit(&mut self) {
        self.statistics.axiom_cache_hits += 1;
    }
    fn on_axiom_cache_miss(&mut self) {
        self.statistics.axiom_cache_misses += 1;
        tracing::trace!("grounded a new axiom");
    }
    fn on_statically_inapplicable(&mut self) {
        self.statistics.num_statically_inapplicable += 1;
        tracing::trace!("binding rejected on static precondition");
    }
    fn statistics(&self) -> &GrounderStatistics {
        &self.statistics
    }
}

pub struct Grounder {
    actions: Vec<GroundAction>,
    action_index: HashMap<(u32, Vec<u32>), u32>,
    axioms: Vec<GroundAxiom>,
    axiom_index: HashMap<(u32, Vec<u32>), u32>,
    /// Two-level ground-literal cache: per lifted literal, keyed by the
    /// subsequence of the binding the literal's parameters select.
    literal_cache: PerKind<Vec<HashMap<Vec<u32>, GroundLiteral>>>,
    event_handler: Box<dyn GrounderEventHandler>,
}

impl Grounder {
    pub fn new(event_handler: Box<dyn GrounderEventHandler>) -> Self {
        Grounder {
            actions: Vec::new(),
            action_index: HashMap::new(),
            axioms: Vec::new(),
            axiom_index: HashMap::new(),
            literal_cache: PerKind::default(),
            event_handler,
        }
    }

    pub fn action(&self, index: u32) -> &GroundAction {
        &self.actions[index as usize]
    }

    pub fn actions(&self) -> &[GroundAction] {
        &self.actions
    }

    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn axiom(&self, index: u32) -> &GroundAxiom {
        &self.axioms[index as usize]
    }

    pub fn axioms(&self) -> &[GroundAxiom] {
        &self.axioms
    }

    pub fn statistics(&self) -> &GrounderStatistics {
        self.event_handler.statistics()
    }

    /// Ground a literal under a binding, through the two-level cache.
    pub fn ground_literal(
        &mut self,
        pool: &mut IrPool,
        kind: Kind,
        literal_index: u32,
        binding: &[u32],
    ) -> GroundLiteral {
        let tables = self.literal_cache.get_mut(kind);
        if tables.len() <= literal_index as usize {
            tables.resize_with(literal_index as usize + 1, HashMap::new);
        }

        let literal = pool.literals.get(kind).get(literal_index).clone();
        let key: Vec<u32> = literal
            .terms
            .iter()
            .filter_map(|term| match term {
                Term::Param(position) => Some(binding[*position as usize]),
                Term::Object(_) => None,
            })
            .collect();

        if let Some(&ground) = tables[literal_index as usize].get(&key) {
            return ground;
        }

        let objects = Problem::ground_terms(&literal.terms, binding);
        let atom = pool.ground_atom(kind, literal.predicate, objects);
        let ground = GroundLiteral {
            atom,
            negated: literal.negated,
        };
        self.literal_cache.get_mut(kind)[literal_index as usize].insert(key, ground);
        ground
    }

    /// Ground a condition's dynamic part; `None` iff a static literal or
    /// a fixed numeric constraint is violated under the binding.
    fn ground_condition(
        &mut self,
        pool: &mut IrPool,
        condition: &ConjunctiveCondition,
        binding: &[u32],
        statics: &Bitset,
        static_values: &[(u32, f64)],
    ) -> Option<GroundCondition> {
        for &literal_index in &condition.statics {
            let ground = self.ground_literal(pool, Kind::Static, literal_index, binding);
            if statics.get(ground.atom as usize) == ground.negated {
                return None;
            }
        }

        let mut out = GroundCondition::default();
        for &literal_index in &condition.fluents {
            let ground = self.ground_literal(pool, Kind::Fluent, literal_index, binding);
            if ground.negated {
                out.fluent_neg.set(ground.atom as usize);
            } else {
                out.fluent_pos.set(ground.atom as usize);
            }
        }
        for &literal_index in &condition.deriveds {
            let ground = self.ground_literal(pool, Kind::Derived, literal_index, binding);
            if ground.negated {
                out.derived_neg.set(ground.atom as usize);
            } else {
                out.derived_pos.set(ground.atom as usize);
            }
        }

        for constraint in &condition.numerics {
            let lhs = ground_numeric_expr(pool, &constraint.lhs, binding);
            let rhs = ground_numeric_expr(pool, &constraint.rhs, binding);
            let ground = GroundNumericConstraint {
                op: constraint.op,
                lhs,
                rhs,
            };
            // A constraint over constants and static functions is fixed:
            // discharge it now instead of re-evaluating per state.
            if let Some(value) = eval_fixed_constraint(pool, &ground, static_values) {
                if !value {
                    return None;
                }
            } else {
                out.numerics.push(ground);
            }
        }
        Some(out)
    }

    fn ground_effect(
        &mut self,
        pool: &mut IrPool,
        effect: &ConjunctiveEffect,
        binding: &[u32],
    ) -> GroundEffect {
        let mut out = GroundEffect::default();
        for &literal_index in &effect.fluents {
            let ground = self.ground_literal(pool, Kind::Fluent, literal_index, binding);
            if ground.negated {
                out.delete.set(ground.atom as usize);
            } else {
                out.add.set(ground.atom as usize);
            }
        }
        for numeric in &effect.numerics {
            let objects = Problem::ground_terms(&numeric.terms, binding);
            let fterm = pool.fterms.intern((numeric.function, objects));
            out.numerics.push(GroundNumericEffect {
                op: numeric.op,
                fterm,
                amount: ground_numeric_expr(pool, &numeric.amount, binding),
            });
        }
        out
    }

    /// Ground an action for a binding, memoised by `(schema, binding)`.
    /// `Ok(None)` means the binding is statically inapplicable.
    pub fn ground_action(
        &mut self,
        pool: &mut IrPool,
        schema: &ActionSchema,
        binding: &[u32],
        statics: &Bitset,
        static_values: &[(u32, f64)],
    ) -> PlannerResult<Option<u32>> {
        let key = (schema.index, binding.to_vec());
        if let Some(&index) = self.action_index.get(&key) {
            self.event_handler.on_action_cache_hit();
            return Ok(Some(index));
        }

        let Some(precondition) =
            self.ground_condition(pool, &schema.precondition, binding, statics, static_values)
        else {
            self.event_handler.on_statically_inapplicable();
            return Ok(None);
        };

        let effect = self.ground_effect(pool, &schema.effect, binding);
        let mut conditional_effects = Vec::new();
        for ce in &schema.conditional_effects {
            self.ground_conditional_effects(
                pool,
                schema.arity(),
                ce,
                binding,
                statics,
                static_values,
                &mut conditional_effects,
            )?;
        }

        let index = u32::try_from(self.actions.len())
            .map_err(|_| PlannerError::Capacity("ground action index space"))?;
        self.actions.push(GroundAction {
            index,
            schema: schema.index,
            binding: key.1.clone(),
            precondition,
            effect,
            conditional_effects,
        });
        self.action_index.insert(key, index);
        self.event_handler.on_action_cache_miss();
        Ok(Some(index))
    }

    /// Expand one lifted conditional effect into its ground instances.
    /// Quantified parameters range over all objects; instances whose
    /// condition is statically impossible are dropped.
    fn ground_conditional_effects(
        &mut self,
        pool: &mut IrPool,
        schema_arity: usize,
        ce: &crate::pddl::ir::ConditionalEffect,
        binding: &[u32],
        statics: &Bitset,
        static_values: &[(u32, f64)],
        out: &mut Vec<GroundConditionalEffect>,
    ) -> PlannerResult<()> {
        debug_assert_eq!(binding.len(), schema_arity);
        let num_objects = pool.objects.len() as u32;

        let mut extended: Vec<u32> = Vec::with_capacity(schema_arity + ce.arity);
        let extensions: Vec<Vec<u32>> = if ce.arity == 0 {
            vec![Vec::new()]
        } else {
            (0..ce.arity)
                .map(|_| 0..num_objects)
                .multi_cartesian_product()
                .collect()
        };

        for extension in extensions {
            extended.clear();
            extended.extend_from_slice(binding);
            extended.extend_from_slice(&extension);

            let Some(condition) =
                self.ground_condition(pool, &ce.condition, &extended, statics, static_values)
            else {
                continue;
            };

            let effect = self.ground_effect(pool, &ce.effect, &extended);
            for atom in effect.add.iter_ones() {
                out.push(GroundConditionalEffect {
                    condition: condition.clone(),
                    effect: GroundSimpleEffect::Literal {
                        negated: false,
                        atom: atom as u32,
                    },
                });
            }
            for atom in effect.delete.iter_ones() {
                out.push(GroundConditionalEffect {
                    condition: condition.clone(),
                    effect: GroundSimpleEffect::Literal {
                        negated: true,
                        atom: atom as u32,
                    },
                });
            }
            for numeric in effect.numerics {
                out.push(GroundConditionalEffect {
                    condition: condition.clone(),
                    effect: GroundSimpleEffect::Numeric(numeric),
                });
            }
        }
        Ok(())
    }

    /// Ground an axiom for a binding, memoised by `(schema, binding)`.
    pub fn ground_axiom(
        &mut self,
        pool: &mut IrPool,
        schema: &AxiomSchema,
        binding: &[u32],
        statics: &Bitset,
        static_values: &[(u32, f64)],
    ) -> PlannerResult<Option<u32>> {
        let key = (schema.index, binding.to_vec());
        if let Some(&index) = self.axiom_index.get(&key) {
            self.event_handler.on_axiom_cache_hit();
            return Ok(Some(index));
        }

        let Some(precondition) =
            self.ground_condition(pool, &schema.body, binding, statics, static_values)
        else {
            self.event_handler.on_statically_inapplicable();
            return Ok(None);
        };

        let head = self
            .ground_literal(pool, Kind::Derived, schema.head, binding)
            .atom;

        let index = u32::try_from(self.axioms.len())
            .map_err(|_| PlannerError::Capacity("ground axiom index space"))?;
        self.axioms.push(GroundAxiom {
            index,
            schema: schema.index,
            binding: key.1.clone(),
            precondition,
            head,
        });
        self.axiom_index.insert(key, index);
        self.event_handler.on_axiom_cache_miss();
        Ok(Some(index))
    }
}

fn ground_numeric_expr(
    pool: &mut IrPool,
    expr: &NumericExpr,
    binding: &[u32],
) -> GroundNumericExpr {
    match expr {
        NumericExpr::Constant(value) => GroundNumericExpr::Constant(*value),
        NumericExpr::Apply(function, terms) => {
            let objects = Problem::ground_terms(terms, binding);
            GroundNumericExpr::Fterm(pool.fterms.intern((*function, objects)))
        }
    }
}

/// Evaluate a ground constraint if both sides are fixed (constants or
/// static functions); `None` when it depends on the state tuple.
fn eval_fixed_constraint(
    pool: &IrPool,
    constraint: &GroundNumericConstraint,
    static_values: &[(u32, f64)],
) -> Option<bool> {
    let fixed_value = |expr: GroundNumericExpr| -> Option<f64> {
        match expr {
            GroundNumericExpr::Constant(value) => Some(value),
            GroundNumericExpr::Fterm(fterm) => {
                let (function, _) = pool.fterms.get(fterm);
                if pool.functions[*function as usize].kind == FunctionKind::Static {
                    // Undefined static values stay undefined forever, so
                    // the constraint can never hold.
                    Some(
                        static_values
                            .iter()
                            .find(|(f, _)| *f == fterm)
                            .map_or(f64::NAN, |(_, v)| *v),
                    )
                } else {
                    None
                }
            }
        }
    };
    let lhs = fixed_value(constraint.lhs)?;
    let rhs = fixed_value(constraint.rhs)?;
    Some(!lhs.is_nan() && !rhs.is_nan() && constraint.op.eval(lhs, rhs))
}

/// Result of the delete-relaxed pre-exploration: the reachable ground
/// element universe and the relaxed-reachable atom sets.
#[derive(Debug, Default)]
pub struct DeleteRelaxedResult {
    pub action_ids: Vec<u32>,
    pub axiom_ids: Vec<u32>,
    pub fluent_atoms: Bitset,
    pub derived_atoms: Bitset,
}

/// Run the delete-relaxed fixpoint from the initial state, grounding
/// every relaxed-applicable action and axiom. Terminates because both
/// atom sets grow monotonically inside finite universes.
pub fn delete_relaxed_explore(
    problem: &mut Problem,
    grounder: &mut Grounder,
    action_generators: &[BindingGenerator],
    axiom_generators: &[BindingGenerator],
    statics: &Bitset,
) -> PlannerResult<DeleteRelaxedResult> {
    let mut dense = DenseState::new();
    for &atom in &problem.initial_fluent_atoms {
        dense.fluent.set(atom as usize);
    }
    dense.numeric = problem.initial_values.clone();

    let mut result = DeleteRelaxedResult::default();
    let mut pending: Vec<(usize, Vec<u32>)> = Vec::new();
    let mut seen_actions = Bitset::new();
    let mut seen_axioms = Bitset::new();

    let Problem {
        ref mut pool,
        ref actions,
        ref axioms,
        ref static_values,
        ..
    } = *problem;

    loop {
        let atoms_before = dense.fluent.count_ones() + dense.derived.count_ones();
        let elements_before = grounder.num_actions() + grounder.axioms().len();

        let fluent_sets =
            AssignmentSet::build(pool, Kind::Fluent, dense.fluent.iter_ones().map(|a| a as u32));
        let derived_sets = AssignmentSet::build(
            pool,
            Kind::Derived,
            dense.derived.iter_ones().map(|a| a as u32),
        );

        // Axioms first: derived atoms feed action preconditions.
        pending.clear();
        {
            let ctx = EvalContext {
                pool,
                statics,
                static_values,
                dense: &dense,
            };
            for (schema_index, generator) in axiom_generators.iter().enumerate() {
                for binding in generator.bindings(ctx, &fluent_sets, &derived_sets, true) {
                    pending.push((schema_index, binding));
                }
            }
        }
        for (schema_index, binding) in pending.drain(..) {
            let schema = &axioms[schema_index];
            if let Some(index) =
                grounder.ground_axiom(pool, schema, &binding, statics, static_values)?
            {
                if !seen_axioms.get(index as usize) {
                    seen_axioms.set(index as usize);
                    result.axiom_ids.push(index);
                }
                dense.derived.set(grounder.axiom(index).head as usize);
            }
        }

        {
            let ctx = EvalContext {
                pool,
                statics,
                static_values,
                dense: &dense,
            };
            for (schema_index, generator) in action_generators.iter().enumerate() {
                for binding in generator.bindings(ctx, &fluent_sets, &derived_sets, true) {
                    pending.push((schema_index, binding));
                }
            }
        }
        for (schema_index, binding) in pending.drain(..) {
            let schema = &actions[schema_index];
            if let Some(index) =
                grounder.ground_action(pool, schema, &binding, statics, static_values)?
            {
                if !seen_actions.get(index as usize) {
                    seen_actions.set(index as usize);
                    result.action_ids.push(index);
                }
                let action = grounder.action(index);
                let add = action.effect.add.clone();
                let conditional_adds: Vec<(GroundCondition, u32)> = action
                    .conditional_effects
                    .iter()
                    .filter_map(|ce| match ce.effect {
                        GroundSimpleEffect::Literal {
                            negated: false,
                            atom,
                        } => Some((ce.condition.clone(), atom)),
                        _ => None,
                    })
                    .collect();
                dense.fluent.union_with(&add);
                for (condition, atom) in conditional_adds {
                    if condition.holds_relaxed(&dense) {
                        dense.fluent.set(atom as usize);
                    }
                }
            }
        }

        let atoms_after = dense.fluent.count_ones() + dense.derived.count_ones();
        let elements_after = grounder.num_actions() + grounder.axioms().len();
        if atoms_after == atoms_before && elements_after == elements_before {
            break;
        }
    }

    result.fluent_atoms = dense.fluent;
    result.derived_atoms = dense.derived;
    tracing::debug!(
        actions = result.action_ids.len(),
        axioms = result.axiom_ids.len(),
        "delete-relaxed exploration finished"
    );
    Ok(result)
}
