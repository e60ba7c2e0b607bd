//! # Lowering
//!
//! Turns a [`NormalizedTask`] into the indexed [`Problem`]: names become
//! dense per-kind indices, variables become parameter positions, lifted
//! literals are interned so the grounder can key caches on them, and the
//! initial state and goal are interned as ground atoms.

use crate::error::{PlannerError, PlannerResult};
use crate::pddl::ast::{AtomAst, CompareOpAst, NumericExprAst, NumericOpAst, TermAst};
use crate::pddl::ir::{
    ActionSchema, AxiomSchema, CompareOp, ConditionalEffect, ConjunctiveCondition,
    ConjunctiveEffect, FunctionKind, GoalCondition, GroundLiteral, IrPool, Kind, Literal,
    NumericConstraint, NumericEffect, NumericExpr, NumericOp, Problem, Term,
};
use crate::pddl::normalize::{
    LiteralAst, NormalizedAction, NormalizedAxiom, NormalizedCondEffect, NormalizedTask,
    NumericConstraintAst, NumericEffectAst,
};
use std::collections::HashMap;

pub fn lower(task: &NormalizedTask) -> PlannerResult<Problem> {
    let mut pool = IrPool::new();

    for name in &task.objects {
        pool.objects.intern(name.clone());
    }
    for name in &task.predicate_order {
        let (kind, arity) = task.predicate_kinds[name];
        pool.add_predicate(kind, name, arity);
    }
    for (name, arity, assigned) in &task.functions {
        let kind = if name == "total-cost" {
            FunctionKind::Auxiliary
        } else if *assigned {
            FunctionKind::Fluent
        } else {
            FunctionKind::Static
        };
        pool.add_function(name, *arity, kind);
    }

    let total_cost_function = pool.find_function("total-cost");

    let mut ctx = Lowerer { pool };

    let mut actions = Vec::new();
    for (index, action) in task.actions.iter().enumerate() {
        actions.push(ctx.lower_action(index as u32, action)?);
    }
    let mut axioms = Vec::new();
    for (index, axiom) in task.axioms.iter().enumerate() {
        axioms.push(ctx.lower_axiom(index as u32, axiom)?);
    }

    // Initial state: ground atoms per kind, deduplicated by interning.
    let mut initial_static_atoms = Vec::new();
    let mut initial_fluent_atoms = Vec::new();
    for atom in &task.init_atoms {
        let (kind, index) = ctx.lower_ground_atom(atom)?;
        match kind {
            Kind::Static => initial_static_atoms.push(index),
            Kind::Fluent => initial_fluent_atoms.push(index),
            Kind::Derived => {
                return Err(PlannerError::InvalidTask(format!(
                    "derived predicate '{}' in the initial state",
                    atom.predicate
                )));
            }
        }
    }
    if task.uses_equality {
        let (_, equality) = ctx
            .pool
            .find_predicate("=")
            .ok_or_else(|| PlannerError::InvalidTask("missing '=' predicate".to_string()))?;
        for object in 0..ctx.pool.objects.len() as u32 {
            initial_static_atoms
                .push(ctx.pool.ground_atom(Kind::Static, equality, vec![object, object]));
        }
    }
    initial_static_atoms.sort_unstable();
    initial_static_atoms.dedup();
    initial_fluent_atoms.sort_unstable();
    initial_fluent_atoms.dedup();

    // Numeric initial values, split into state tuple vs fixed table.
    let mut initial_values = Vec::new();
    let mut static_values = Vec::new();
    for (name, args, value) in &task.init_values {
        let function = ctx.pool.find_function(name).ok_or_else(|| {
            PlannerError::InvalidTask(format!("unknown function '{name}' in init"))
        })?;
        let objects = args
            .iter()
            .map(|arg| ctx.lookup_object(arg))
            .collect::<PlannerResult<Vec<u32>>>()?;
        let fterm = ctx.pool.fterms.intern((function, objects));
        match ctx.pool.functions[function as usize].kind {
            // total-cost accumulates per plan, never in the state.
            FunctionKind::Auxiliary => {}
            FunctionKind::Fluent => initial_values.push((fterm, *value)),
            FunctionKind::Static => static_values.push((fterm, *value)),
        }
    }

    let mut goal = GoalCondition::default();
    for literal in &task.goal {
        let (kind, atom) = ctx.lower_ground_atom(&literal.atom)?;
        let ground = GroundLiteral {
            atom,
            negated: literal.negated,
        };
        match kind {
            Kind::Static => goal.statics.push(ground),
            Kind::Fluent => goal.fluents.push(ground),
            Kind::Derived => goal.deriveds.push(ground),
        }
    }

    Ok(Problem {
        domain_name: task.domain_name.clone(),
        problem_name: task.problem_name.clone(),
        pool: ctx.pool,
        actions,
        axioms,
        initial_static_atoms,
        initial_fluent_atoms,
        initial_values,
        static_values,
        goal,
        metric_total_cost: task.metric_total_cost,
        total_cost_function,
    })
}

struct Lowerer {
    pool: IrPool,
}

impl Lowerer {
    fn lookup_object(&self, name: &str) -> PlannerResult<u32> {
        self.pool
            .objects
            .find(&name.to_string())
            .ok_or_else(|| PlannerError::InvalidTask(format!("unknown object '{name}'")))
    }

    fn lower_term(&self, term: &TermAst, positions: &HashMap<String, u32>) -> PlannerResult<Term> {
        match term {
            TermAst::Variable(name) => positions
                .get(name)
                .map(|&position| Term::Param(position))
                .ok_or_else(|| PlannerError::InvalidTask(format!("unbound variable '?{name}'"))),
            TermAst::Name(name) => Ok(Term::Object(self.lookup_object(name)?)),
        }
    }

    /// Intern a lifted literal, returning its kind and index.
    fn lower_literal(
        &mut self,
        literal: &LiteralAst,
        positions: &HashMap<String, u32>,
    ) -> PlannerResult<(Kind, u32)> {
        let (kind, predicate) = self
            .pool
            .find_predicate(&literal.atom.predicate)
            .ok_or_else(|| {
                PlannerError::InvalidTask(format!(
                    "unknown predicate '{}'",
                    literal.atom.predicate
                ))
            })?;
        let terms = literal
            .atom
            .args
            .iter()
            .map(|term| self.lower_term(term, positions))
            .collect::<PlannerResult<Vec<Term>>>()?;
        let index = self.pool.literals.get_mut(kind).intern(Literal {
            predicate,
            terms,
            negated: literal.negated,
        });
        Ok((kind, index))
    }

    fn lower_condition(
        &mut self,
        arity: usize,
        literals: &[LiteralAst],
        numerics: &[NumericConstraintAst],
        positions: &HashMap<String, u32>,
    ) -> PlannerResult<ConjunctiveCondition> {
        let mut condition = ConjunctiveCondition {
            arity,
            ..ConjunctiveCondition::default()
        };
        for literal in literals {
            let (kind, index) = self.lower_literal(literal, positions)?;
            match kind {
                Kind::Static => condition.statics.push(index),
                Kind::Fluent => condition.fluents.push(index),
                Kind::Derived => condition.deriveds.push(index),
            }
        }
        for (op, lhs, rhs) in numerics {
            condition.numerics.push(NumericConstraint {
                op: lower_compare_op(*op),
                lhs: self.lower_numeric_expr(lhs, positions)?,
                rhs: self.lower_numeric_expr(rhs, positions)?,
            });
        }
        Ok(condition)
    }

    fn lower_effect(
        &mut self,
        literals: &[LiteralAst],
        numerics: &[NumericEffectAst],
        positions: &HashMap<String, u32>,
    ) -> PlannerResult<ConjunctiveEffect> {
        let mut effect = ConjunctiveEffect::default();
        for literal in literals {
            let (kind, index) = self.lower_literal(literal, positions)?;
            if kind != Kind::Fluent {
                return Err(PlannerError::InvalidTask(format!(
                    "effect on non-fluent predicate '{}'",
                    literal.atom.predicate
                )));
            }
            effect.fluents.push(index);
        }
        for (op, name, terms, amount) in numerics {
            let function = self.pool.find_function(name).ok_or_else(|| {
                PlannerError::InvalidTask(format!("unknown function '{name}'"))
            })?;
            effect.numerics.push(NumericEffect {
                op: lower_numeric_op(*op),
                function,
                terms: terms
                    .iter()
                    .map(|term| self.lower_term(term, positions))
                    .collect::<PlannerResult<_>>()?,
                amount: self.lower_numeric_expr(amount, positions)?,
            });
        }
        Ok(effect)
    }

    fn lower_numeric_expr(
        &mut self,
        expr: &NumericExprAst,
        positions: &HashMap<String, u32>,
    ) -> PlannerResult<NumericExpr> {
        match expr {
            NumericExprAst::Number(value) => Ok(NumericExpr::Constant(*value)),
            NumericExprAst::Apply(name, terms) => {
                let function = self.pool.find_function(name).ok_or_else(|| {
                    PlannerError::InvalidTask(format!("unknown function '{name}'"))
                })?;
                Ok(NumericExpr::Apply(
                    function,
                    terms
                        .iter()
                        .map(|term| self.lower_term(term, positions))
                        .collect::<PlannerResult<_>>()?,
                ))
            }
        }
    }

    fn lower_action(&mut self, index: u32, action: &NormalizedAction) -> PlannerResult<ActionSchema> {
        let positions = position_map(&action.parameters);
        let arity = action.parameters.len();

        let precondition = self.lower_condition(
            arity,
            &action.precondition,
            &action.numeric_constraints,
            &positions,
        )?;
        let effect = self.lower_effect(&action.effects, &action.numeric_effects, &positions)?;

        let mut conditional_effects = Vec::new();
        for ce in &action.conditional {
            conditional_effects.push(self.lower_conditional_effect(arity, &positions, ce)?);
        }

        Ok(ActionSchema {
            index,
            name: action.name.clone(),
            parameters: action.parameters.clone(),
            original_arity: action.original_arity,
            precondition,
            effect,
            conditional_effects,
        })
    }

    fn lower_conditional_effect(
        &mut self,
        schema_arity: usize,
        schema_positions: &HashMap<String, u32>,
        ce: &NormalizedCondEffect,
    ) -> PlannerResult<ConditionalEffect> {
        // Quantified parameters extend the schema's position space.
        let mut positions = schema_positions.clone();
        for (offset, name) in ce.parameters.iter().enumerate() {
            positions.insert(name.clone(), (schema_arity + offset) as u32);
        }
        let total_arity = schema_arity + ce.parameters.len();
        Ok(ConditionalEffect {
            arity: ce.parameters.len(),
            condition: self.lower_condition(
                total_arity,
                &ce.condition,
                &ce.numeric_constraints,
                &positions,
            )?,
            effect: self.lower_effect(&ce.effects, &ce.numeric_effects, &positions)?,
        })
    }

    fn lower_axiom(&mut self, index: u32, axiom: &NormalizedAxiom) -> PlannerResult<AxiomSchema> {
        let positions = position_map(&axiom.parameters);
        let body = self.lower_condition(
            axiom.parameters.len(),
            &axiom.body,
            &axiom.numeric_constraints,
            &positions,
        )?;
        let head_literal = LiteralAst {
            atom: axiom.head.clone(),
            negated: false,
        };
        let (kind, head) = self.lower_literal(&head_literal, &positions)?;
        if kind != Kind::Derived {
            return Err(PlannerError::InvalidTask(format!(
                "axiom head '{}' is not a derived predicate",
                axiom.head.predicate
            )));
        }
        Ok(AxiomSchema {
            index,
            parameters: axiom.parameters.clone(),
            body,
            head,
        })
    }

    /// Intern a ground atom from the surface AST.
    fn lower_ground_atom(&mut self, atom: &AtomAst) -> PlannerResult<(Kind, u32)> {
        let (kind, predicate) = self.pool.find_predicate(&atom.predicate).ok_or_else(|| {
            PlannerError::InvalidTask(format!("unknown predicate '{}'", atom.predicate))
        })?;
        let objects = atom
            .args
            .iter()
            .map(|arg| match arg {
                TermAst::Name(name) => self.lookup_object(name),
                TermAst::Variable(name) => Err(PlannerError::InvalidTask(format!(
                    "variable '?{name}' in a ground atom"
                ))),
            })
            .collect::<PlannerResult<Vec<u32>>>()?;
        let index = self.pool.ground_atom(kind, predicate, objects);
        Ok((kind, index))
    }
}

fn position_map(parameters: &[String]) -> HashMap<String, u32> {
    parameters
        .iter()
        .enumerate()
        .map(|(position, name)| (name.clone(), position as u32))
        .collect()
}

fn lower_compare_op(op: CompareOpAst) -> CompareOp {
    match op {
        CompareOpAst::Lt => CompareOp::Lt,
        CompareOpAst::Le => CompareOp::Le,
        CompareOpAst::Eq => CompareOp::Eq,
        CompareOpAst::Ge => CompareOp::Ge,
        CompareOpAst::Gt => CompareOp::Gt,
    }
}

fn lower_numeric_op(op: NumericOpAst) -> NumericOp {
    match op {
        NumericOpAst::Assign => NumericOp::Assign,
        NumericOpAst::Increase => NumericOp::Increase,
        NumericOpAst::Decrease => NumericOp::Decrease,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pddl::normalize::normalize;
    use crate::pddl::parser::{parse_domain, parse_problem};

    fn lower_task(domain: &str, problem: &str) -> Problem {
        let domain = parse_domain(domain).unwrap();
        let problem = parse_problem(problem).unwrap();
        lower(&normalize(&domain, &problem).unwrap()).unwrap()
    }

    #[test]
    fn test_lower_counts_and_kinds() {
        let problem = lower_task(
            "(define (domain t)
               (:predicates (at ?x ?y) (road ?x ?y))
               (:action drive :parameters (?a ?b)
                 :precondition (and (at ?a ?a) (road ?a ?b))
                 :effect (and (not (at ?a ?a)) (at ?b ?b))))",
            "(define (problem p) (:domain t)
               (:objects l1 l2)
               (:init (at l1 l1) (road l1 l2))
               (:goal (at l2 l2)))",
        );
        assert_eq!(problem.pool.predicates.get(Kind::Fluent).len(), 1);
        assert_eq!(problem.pool.predicates.get(Kind::Static).len(), 1);
        assert_eq!(problem.actions.len(), 1);
        assert_eq!(problem.initial_fluent_atoms.len(), 1);
        assert_eq!(problem.initial_static_atoms.len(), 1);
        assert_eq!(problem.goal.fluents.len(), 1);

        let action = &problem.actions[0];
        assert_eq!(action.precondition.fluents.len(), 1);
        assert_eq!(action.precondition.statics.len(), 1);
        assert_eq!(action.effect.fluents.len(), 2);
    }

    #[test]
    fn test_parameter_positions_are_binding_keys() {
        let problem = lower_task(
            "(define (domain t)
               (:predicates (p ?x ?y))
               (:action a :parameters (?u ?v)
                 :precondition (p ?v ?u)
                 :effect (p ?u ?v)))",
            "(define (problem i) (:domain t) (:objects o1 o2) (:init (p o2 o1)) (:goal (p o1 o2)))",
        );
        let action = &problem.actions[0];
        let literal = problem
            .pool
            .literals
            .get(Kind::Fluent)
            .get(action.precondition.fluents[0]);
        assert_eq!(literal.terms, vec![Term::Param(1), Term::Param(0)]);
    }

    #[test]
    fn test_equality_gets_reflexive_atoms() {
        let problem = lower_task(
            "(define (domain t)
               (:predicates (on ?x ?y))
               (:action put :parameters (?a ?b)
                 :precondition (not (= ?a ?b))
                 :effect (on ?a ?b)))",
            "(define (problem i) (:domain t) (:objects o1 o2 o3) (:init) (:goal (on o1 o2)))",
        );
        // One reflexive equality atom per object.
        assert_eq!(problem.initial_static_atoms.len(), 3);
    }

    #[test]
    fn test_total_cost_is_auxiliary() {
        let problem = lower_task(
            "(define (domain t)
               (:predicates (p ?x))
               (:functions (total-cost))
               (:action a :parameters (?x)
                 :precondition ()
                 :effect (and (p ?x) (increase (total-cost) 2))))",
            "(define (problem i) (:domain t) (:objects o)
               (:init (= (total-cost) 0))
               (:goal (p o)) (:metric minimize (total-cost)))",
        );
        assert!(problem.metric_total_cost);
        let function = problem.total_cost_function.unwrap();
        assert_eq!(
            problem.pool.functions[function as usize].kind,
            FunctionKind::Auxiliary
        );
        // total-cost never enters the state numeric tuple.
        assert!(problem.initial_values.is_empty());
    }
}
