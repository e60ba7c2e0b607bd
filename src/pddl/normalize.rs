//! # Task Normalisation
//!
//! Rewrites the surface AST into the shape the search core relies on:
//!
//! 1. **Typing** is compiled away: every type becomes a unary static
//!    predicate, object declarations become initial atoms over the type
//!    and its ancestors, and typed parameters become extra body literals.
//! 2. **Quantified and conditional effects** are flattened: `forall`
//!    introduces quantified parameters on a conditional effect, `when`
//!    contributes its condition; everything else is unconditional.
//! 3. **Predicate kinds** are classified: axiom heads are derived,
//!    predicates touched by effects are fluent, the rest are static.
//! 4. **Positive normal form**: a negated fluent/derived literal in an
//!    action precondition or conditional-effect condition is replaced by
//!    a positive literal over a dual derived predicate `not <p>`, defined
//!    by a companion axiom. Axiom bodies keep their negations; the
//!    stratified evaluator handles those.

use crate::error::{PlannerError, PlannerResult};
use crate::pddl::ast::{
    AtomAst, CompareOpAst, Condition, DomainAst, Effect, NumericExprAst, NumericOpAst, ProblemAst,
    TermAst, TypedName,
};
use crate::pddl::ir::Kind;
use std::collections::{HashMap, HashSet};

/// A flattened literal over the surface vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralAst {
    pub atom: AtomAst,
    pub negated: bool,
}

pub type NumericConstraintAst = (CompareOpAst, NumericExprAst, NumericExprAst);
pub type NumericEffectAst = (NumericOpAst, String, Vec<TermAst>, NumericExprAst);

/// A conditional effect after expansion: extra quantified parameters,
/// a flat condition, and a flat effect.
#[derive(Debug, Clone)]
pub struct NormalizedCondEffect {
    pub parameters: Vec<String>,
    pub condition: Vec<LiteralAst>,
    pub numeric_constraints: Vec<NumericConstraintAst>,
    pub effects: Vec<LiteralAst>,
    pub numeric_effects: Vec<NumericEffectAst>,
}

#[derive(Debug, Clone)]
pub struct NormalizedAction {
    pub name: String,
    pub parameters: Vec<String>,
    pub original_arity: usize,
    pub precondition: Vec<LiteralAst>,
    pub numeric_constraints: Vec<NumericConstraintAst>,
    pub effects: Vec<LiteralAst>,
    pub numeric_effects: Vec<NumericEffectAst>,
    pub conditional: Vec<NormalizedCondEffect>,
}

#[derive(Debug, Clone)]
pub struct NormalizedAxiom {
    pub head: AtomAst,
    pub parameters: Vec<String>,
    pub body: Vec<LiteralAst>,
    pub numeric_constraints: Vec<NumericConstraintAst>,
}

/// The normalised task handed to the lowering pass.
#[derive(Debug, Clone)]
pub struct NormalizedTask {
    pub domain_name: String,
    pub problem_name: String,
    pub objects: Vec<String>,
    /// Predicate name → (kind, arity), in declaration order below.
    pub predicate_kinds: HashMap<String, (Kind, usize)>,
    pub predicate_order: Vec<String>,
    /// Function name → (arity, assigned-by-effects).
    pub functions: Vec<(String, usize, bool)>,
    pub actions: Vec<NormalizedAction>,
    pub axioms: Vec<NormalizedAxiom>,
    pub init_atoms: Vec<AtomAst>,
    pub init_values: Vec<(String, Vec<String>, f64)>,
    pub goal: Vec<LiteralAst>,
    pub metric_total_cost: bool,
    pub uses_equality: bool,
}

pub fn normalize(domain: &DomainAst, problem: &ProblemAst) -> PlannerResult<NormalizedTask> {
    if problem.domain != domain.name {
        return Err(PlannerError::InvalidTask(format!(
            "problem references domain '{}', file defines '{}'",
            problem.domain, domain.name
        )));
    }

    let types = TypeTable::build(&domain.types)?;

    // Predicate table: declared predicates plus one unary static
    // predicate per declared type.
    let mut predicate_order: Vec<String> = Vec::new();
    let mut arities: HashMap<String, usize> = HashMap::new();
    for decl in &domain.predicates {
        if arities
            .insert(decl.name.clone(), decl.params.len())
            .is_some()
        {
            return Err(PlannerError::InvalidTask(format!(
                "predicate '{}' declared twice",
                decl.name
            )));
        }
        predicate_order.push(decl.name.clone());
    }
    for ty in types.names() {
        if arities.contains_key(ty) {
            return Err(PlannerError::InvalidTask(format!(
                "type '{ty}' clashes with a predicate of the same name"
            )));
        }
        arities.insert(ty.to_string(), 1);
        predicate_order.push(ty.to_string());
    }

    // Objects: domain constants first, then problem objects.
    let mut objects: Vec<String> = Vec::new();
    let mut object_types: Vec<(String, String)> = Vec::new();
    for typed in domain.constants.iter().chain(problem.objects.iter()) {
        if objects.contains(&typed.name) {
            return Err(PlannerError::InvalidTask(format!(
                "object '{}' declared twice",
                typed.name
            )));
        }
        objects.push(typed.name.clone());
        object_types.push((typed.name.clone(), typed.ty.clone()));
    }

    // Initial atoms: declared init plus object typing.
    let mut init_atoms = problem.init_atoms.clone();
    for (object, ty) in &object_types {
        for ancestor in types.closure(ty)? {
            init_atoms.push(AtomAst {
                predicate: ancestor.clone(),
                args: vec![TermAst::Name(object.clone())],
            });
        }
    }

    let mut ctx = Normalizer {
        types: &types,
        arities,
        predicate_order,
        uses_equality: false,
    };

    // Flatten actions and axioms.
    let mut actions = Vec::new();
    for action in &domain.actions {
        actions.push(ctx.normalize_action(action)?);
    }
    let mut axioms = Vec::new();
    for axiom in &domain.axioms {
        axioms.push(ctx.normalize_axiom(axiom)?);
    }

    // Classify predicate kinds.
    let derived: HashSet<String> = axioms.iter().map(|a| a.head.predicate.clone()).collect();
    let mut fluent: HashSet<String> = HashSet::new();
    for action in &actions {
        for literal in action
            .effects
            .iter()
            .chain(action.conditional.iter().flat_map(|ce| ce.effects.iter()))
        {
            if derived.contains(&literal.atom.predicate) {
                return Err(PlannerError::InvalidTask(format!(
                    "derived predicate '{}' appears in an action effect",
                    literal.atom.predicate
                )));
            }
            fluent.insert(literal.atom.predicate.clone());
        }
    }

    let mut predicate_kinds: HashMap<String, (Kind, usize)> = HashMap::new();
    for name in &ctx.predicate_order {
        let arity = ctx.arities[name];
        let kind = if derived.contains(name) {
            Kind::Derived
        } else if fluent.contains(name) {
            Kind::Fluent
        } else {
            Kind::Static
        };
        predicate_kinds.insert(name.clone(), (kind, arity));
    }
    if ctx.uses_equality {
        predicate_kinds.insert("=".to_string(), (Kind::Static, 2));
        ctx.predicate_order.push("=".to_string());
    }

    // Positive normal form over action conditions.
    let mut pnf = PositiveNormalForm {
        kinds: &mut predicate_kinds,
        order: &mut ctx.predicate_order,
        companion_axioms: Vec::new(),
        duals_done: HashSet::new(),
    };
    for action in &mut actions {
        pnf.rewrite(&mut action.precondition);
        for ce in &mut action.conditional {
            pnf.rewrite(&mut ce.condition);
        }
    }
    axioms.extend(pnf.companion_axioms);

    // Goal: a ground conjunction of literals.
    let (goal, goal_numerics) = flatten_condition(&problem.goal)?;
    if !goal_numerics.is_empty() {
        return Err(PlannerError::Unsupported(
            "numeric constraints in the goal".to_string(),
        ));
    }
    for literal in &goal {
        if literal
            .atom
            .args
            .iter()
            .any(|a| matches!(a, TermAst::Variable(_)))
        {
            return Err(PlannerError::Unsupported(
                "non-ground goal literals".to_string(),
            ));
        }
        ctx.check_atom(&literal.atom)?;
    }

    // Functions: total-cost is auxiliary; anything assigned by an effect
    // is fluent, the rest static.
    let mut assigned: HashSet<String> = HashSet::new();
    for action in &actions {
        for (_, name, _, _) in action
            .numeric_effects
            .iter()
            .chain(action.conditional.iter().flat_map(|ce| ce.numeric_effects.iter()))
        {
            assigned.insert(name.clone());
        }
    }
    let functions = domain
        .functions
        .iter()
        .map(|decl| {
            (
                decl.name.clone(),
                decl.params.len(),
                assigned.contains(&decl.name),
            )
        })
        .collect();

    Ok(NormalizedTask {
        domain_name: domain.name.clone(),
        problem_name: problem.name.clone(),
        objects,
        predicate_kinds,
        predicate_order: ctx.predicate_order,
        functions,
        actions,
        axioms,
        init_atoms,
        init_values: problem.init_values.clone(),
        goal,
        metric_total_cost: problem.metric_minimize_total_cost,
        uses_equality: ctx.uses_equality,
    })
}

/// Type hierarchy with ancestor-chain lookup. `object` is the implicit
/// root and never produces a predicate.
struct TypeTable {
    parents: HashMap<String, String>,
}

impl TypeTable {
    fn build(declared: &[(String, String)]) -> PlannerResult<TypeTable> {
        let mut parents = HashMap::new();
        for (ty, parent) in declared {
            parents.insert(ty.clone(), parent.clone());
        }
        // A type that only ever appears as a supertype is still a type.
        for (_, parent) in declared {
            if parent != "object" && !parents.contains_key(parent) {
                parents.insert(parent.clone(), "object".to_string());
            }
        }
        let table = TypeTable { parents };
        for ty in table.parents.keys() {
            table.closure(ty)?; // reject cycles up front
        }
        Ok(table)
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        // Deterministic order for index assignment downstream.
        let mut names: Vec<&str> = self.parents.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.into_iter()
    }

    /// The type and its ancestors, excluding `object`.
    fn closure(&self, ty: &str) -> PlannerResult<Vec<String>> {
        let mut out = Vec::new();
        let mut current = ty;
        while current != "object" {
            if out.iter().any(|seen| seen == current) {
                return Err(PlannerError::InvalidTask(format!(
                    "type hierarchy cycle through '{current}'"
                )));
            }
            out.push(current.to_string());
            current = self.parents.get(current).map_or("object", String::as_str);
        }
        Ok(out)
    }

    /// Unary type literals for a typed parameter list.
    fn parameter_literals(&self, params: &[TypedName]) -> PlannerResult<Vec<LiteralAst>> {
        let mut out = Vec::new();
        for param in params {
            if param.ty == "object" {
                continue;
            }
            if !self.parents.contains_key(&param.ty) {
                return Err(PlannerError::InvalidTask(format!(
                    "unknown type '{}'",
                    param.ty
                )));
            }
            out.push(LiteralAst {
                atom: AtomAst {
                    predicate: param.ty.clone(),
                    args: vec![TermAst::Variable(param.name.clone())],
                },
                negated: false,
            });
        }
        Ok(out)
    }
}

struct Normalizer<'a> {
    types: &'a TypeTable,
    arities: HashMap<String, usize>,
    predicate_order: Vec<String>,
    uses_equality: bool,
}

impl Normalizer<'_> {
    fn check_atom(&mut self, atom: &AtomAst) -> PlannerResult<()> {
        if atom.predicate == "=" {
            if atom.args.len() != 2 {
                return Err(PlannerError::InvalidTask("'=' takes two terms".to_string()));
            }
            self.uses_equality = true;
            return Ok(());
        }
        match self.arities.get(&atom.predicate) {
            None => Err(PlannerError::InvalidTask(format!(
                "unknown predicate '{}'",
                atom.predicate
            ))),
            Some(&arity) if arity != atom.args.len() => Err(PlannerError::InvalidTask(format!(
                "predicate '{}' expects {} arguments, got {}",
                atom.predicate,
                arity,
                atom.args.len()
            ))),
            Some(_) => Ok(()),
        }
    }

    fn check_literals(&mut self, literals: &[LiteralAst]) -> PlannerResult<()> {
        for literal in literals {
            self.check_atom(&literal.atom)?;
        }
        Ok(())
    }

    fn normalize_action(
        &mut self,
        action: &crate::pddl::ast::ActionAst,
    ) -> PlannerResult<NormalizedAction> {
        let original_arity = action.parameters.len();
        let parameters: Vec<String> =
            action.parameters.iter().map(|p| p.name.clone()).collect();

        let (flat, numeric_constraints) = flatten_condition(&action.precondition)?;
        let mut precondition = self.types.parameter_literals(&action.parameters)?;
        precondition.extend(flat);
        self.check_literals(&precondition)?;

        let mut out = NormalizedAction {
            name: action.name.clone(),
            parameters,
            original_arity,
            precondition,
            numeric_constraints,
            effects: Vec::new(),
            numeric_effects: Vec::new(),
            conditional: Vec::new(),
        };
        self.collect_effects(&action.effect, &mut Vec::new(), &mut out)?;
        self.check_literals(&out.effects)?;
        for ce in &out.conditional {
            let literals: Vec<LiteralAst> =
                ce.condition.iter().chain(ce.effects.iter()).cloned().collect();
            self.check_literals(&literals)?;
        }
        Ok(out)
    }

    /// Walk an effect tree, accumulating `forall` parameters and `when`
    /// conditions on the path; a leaf under neither is unconditional.
    fn collect_effects(
        &mut self,
        effect: &Effect,
        scope: &mut Vec<(Vec<TypedName>, Condition)>,
        out: &mut NormalizedAction,
    ) -> PlannerResult<()> {
        match effect {
            Effect::And(parts) => {
                for part in parts {
                    self.collect_effects(part, scope, out)?;
                }
                Ok(())
            }
            Effect::Forall(vars, inner) => {
                scope.push((vars.clone(), Condition::And(Vec::new())));
                self.collect_effects(inner, scope, out)?;
                scope.pop();
                Ok(())
            }
            Effect::When(condition, inner) => {
                scope.push((Vec::new(), condition.clone()));
                self.collect_effects(inner, scope, out)?;
                scope.pop();
                Ok(())
            }
            Effect::Literal(atom, negated) => {
                let literal = LiteralAst {
                    atom: atom.clone(),
                    negated: *negated,
                };
                self.emit_effect(scope, Some(literal), None, out)
            }
            Effect::Numeric(op, function, terms, amount) => {
                let numeric = (*op, function.clone(), terms.clone(), amount.clone());
                self.emit_effect(scope, None, Some(numeric), out)
            }
        }
    }

    fn emit_effect(
        &mut self,
        scope: &[(Vec<TypedName>, Condition)],
        literal: Option<LiteralAst>,
        numeric: Option<NumericEffectAst>,
        out: &mut NormalizedAction,
    ) -> PlannerResult<()> {
        if scope.is_empty() {
            out.effects.extend(literal);
            out.numeric_effects.extend(numeric);
            return Ok(());
        }

        let mut parameters = Vec::new();
        let mut condition = Vec::new();
        let mut numeric_constraints = Vec::new();
        for (vars, when) in scope {
            condition.extend(self.types.parameter_literals(vars)?);
            parameters.extend(vars.iter().map(|v| v.name.clone()));
            let (literals, numerics) = flatten_condition(when)?;
            condition.extend(literals);
            numeric_constraints.extend(numerics);
        }
        self.check_literals(&condition)?;

        out.conditional.push(NormalizedCondEffect {
            parameters,
            condition,
            numeric_constraints,
            effects: literal.into_iter().collect(),
            numeric_effects: numeric.into_iter().collect(),
        });
        Ok(())
    }

    fn normalize_axiom(
        &mut self,
        axiom: &crate::pddl::ast::AxiomAst,
    ) -> PlannerResult<NormalizedAxiom> {
        let (flat, numeric_constraints) = flatten_condition(&axiom.body)?;
        let mut body = self.types.parameter_literals(&axiom.parameters)?;
        body.extend(flat);
        self.check_literals(&body)?;
        self.check_atom(&axiom.head)?;

        // Body-only variables are implicitly existential; they extend
        // the schema's parameters after the head's.
        let mut parameters: Vec<String> =
            axiom.parameters.iter().map(|p| p.name.clone()).collect();
        let body_terms = body.iter().flat_map(|literal| literal.atom.args.iter());
        let numeric_terms = numeric_constraints.iter().flat_map(|(_, lhs, rhs)| {
            let of = |expr: &'_ NumericExprAst| match expr {
                NumericExprAst::Apply(_, terms) => terms.clone(),
                NumericExprAst::Number(_) => Vec::new(),
            };
            of(lhs).into_iter().chain(of(rhs))
        });
        let numeric_terms: Vec<TermAst> = numeric_terms.collect();
        for term in body_terms.chain(numeric_terms.iter()) {
            if let TermAst::Variable(name) = term {
                if !parameters.contains(name) {
                    parameters.push(name.clone());
                }
            }
        }

        Ok(NormalizedAxiom {
            head: axiom.head.clone(),
            parameters,
            body,
            numeric_constraints,
        })
    }
}

/// Flatten a condition into literals and numeric constraints. `not` may
/// only wrap an atom; anything else is outside the fragment.
pub fn flatten_condition(
    condition: &Condition,
) -> PlannerResult<(Vec<LiteralAst>, Vec<NumericConstraintAst>)> {
    let mut literals = Vec::new();
    let mut numerics = Vec::new();
    flatten_into(condition, false, &mut literals, &mut numerics)?;
    Ok((literals, numerics))
}

fn flatten_into(
    condition: &Condition,
    negated: bool,
    literals: &mut Vec<LiteralAst>,
    numerics: &mut Vec<NumericConstraintAst>,
) -> PlannerResult<()> {
    match condition {
        Condition::Atom(atom) => {
            literals.push(LiteralAst {
                atom: atom.clone(),
                negated,
            });
            Ok(())
        }
        Condition::Not(inner) => {
            if negated {
                return Err(PlannerError::Unsupported(
                    "double negation in conditions".to_string(),
                ));
            }
            flatten_into(inner, true, literals, numerics)
        }
        Condition::And(parts) => {
            if negated {
                return Err(PlannerError::Unsupported(
                    "negated conjunctions in conditions".to_string(),
                ));
            }
            for part in parts {
                flatten_into(part, false, literals, numerics)?;
            }
            Ok(())
        }
        Condition::Compare(op, lhs, rhs) => {
            if negated {
                return Err(PlannerError::Unsupported(
                    "negated numeric comparisons".to_string(),
                ));
            }
            numerics.push((*op, lhs.clone(), rhs.clone()));
            Ok(())
        }
    }
}

/// Rewrites negated fluent/derived literals into positive literals over
/// dual derived predicates, registering companion axioms.
struct PositiveNormalForm<'a> {
    kinds: &'a mut HashMap<String, (Kind, usize)>,
    order: &'a mut Vec<String>,
    companion_axioms: Vec<NormalizedAxiom>,
    duals_done: HashSet<String>,
}

impl PositiveNormalForm<'_> {
    fn rewrite(&mut self, literals: &mut Vec<LiteralAst>) {
        for literal in literals {
            if !literal.negated {
                continue;
            }
            let Some(&(kind, arity)) = self.kinds.get(&literal.atom.predicate) else {
                continue;
            };
            if kind == Kind::Static {
                continue;
            }
            let dual = self.dual_for(&literal.atom.predicate, arity);
            literal.atom.predicate = dual;
            literal.negated = false;
        }
    }

    /// The dual predicate `not <p>` plus its companion axiom
    /// `(not <p>)(x...) :- not p(x...)`, created once per predicate.
    fn dual_for(&mut self, predicate: &str, arity: usize) -> String {
        let dual = format!("not {predicate}");
        if self.duals_done.insert(predicate.to_string()) {
            self.kinds.insert(dual.clone(), (Kind::Derived, arity));
            self.order.push(dual.clone());

            let parameters: Vec<String> = (0..arity).map(|i| format!("x{i}")).collect();
            let args: Vec<TermAst> = parameters
                .iter()
                .map(|name| TermAst::Variable(name.clone()))
                .collect();
            self.companion_axioms.push(NormalizedAxiom {
                head: AtomAst {
                    predicate: dual.clone(),
                    args: args.clone(),
                },
                parameters,
                body: vec![LiteralAst {
                    atom: AtomAst {
                        predicate: predicate.to_string(),
                        args,
                    },
                    negated: true,
                }],
                numeric_constraints: Vec::new(),
            });
        }
        dual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pddl::parser::{parse_domain, parse_problem};

    fn toy_task(domain: &str, problem: &str) -> NormalizedTask {
        let domain = parse_domain(domain).unwrap();
        let problem = parse_problem(problem).unwrap();
        normalize(&domain, &problem).unwrap()
    }

    #[test]
    fn test_typing_becomes_static_predicates() {
        let task = toy_task(
            "(define (domain t)
               (:types room ball - object)
               (:predicates (at ?b - ball ?r - room))
               (:action drop :parameters (?b - ball ?r - room)
                 :precondition () :effect (at ?b ?r)))",
            "(define (problem p) (:domain t)
               (:objects b1 - ball r1 - room)
               (:init)
               (:goal (at b1 r1)))",
        );
        assert_eq!(task.predicate_kinds["room"], (Kind::Static, 1));
        assert_eq!(task.predicate_kinds["ball"], (Kind::Static, 1));
        assert_eq!(task.predicate_kinds["at"], (Kind::Fluent, 2));
        // Object typing shows up in init.
        assert!(task
            .init_atoms
            .iter()
            .any(|a| a.predicate == "ball" && a.args == vec![TermAst::Name("b1".into())]));
        // Parameter typing shows up in the precondition.
        let action = &task.actions[0];
        assert!(action
            .precondition
            .iter()
            .any(|l| l.atom.predicate == "ball" && !l.negated));
    }

    #[test]
    fn test_positive_normal_form_introduces_dual() {
        let task = toy_task(
            "(define (domain t)
               (:predicates (p ?x) (q ?x))
               (:action a :parameters (?x)
                 :precondition (and (q ?x) (not (p ?x)))
                 :effect (p ?x)))",
            "(define (problem i) (:domain t) (:objects o) (:init (q o)) (:goal (p o)))",
        );
        let action = &task.actions[0];
        assert!(action.precondition.iter().all(|l| !l.negated));
        assert!(action
            .precondition
            .iter()
            .any(|l| l.atom.predicate == "not p"));
        assert_eq!(task.predicate_kinds["not p"], (Kind::Derived, 1));
        // Companion axiom derives the dual from the negated original.
        let companion = task
            .axioms
            .iter()
            .find(|ax| ax.head.predicate == "not p")
            .unwrap();
        assert_eq!(companion.body.len(), 1);
        assert!(companion.body[0].negated);
        assert_eq!(companion.body[0].atom.predicate, "p");
    }

    #[test]
    fn test_negated_static_stays_negative() {
        let task = toy_task(
            "(define (domain t)
               (:predicates (fixed ?x) (on ?x))
               (:action a :parameters (?x)
                 :precondition (not (fixed ?x))
                 :effect (on ?x)))",
            "(define (problem i) (:domain t) (:objects o) (:init) (:goal (on o)))",
        );
        let action = &task.actions[0];
        assert_eq!(action.precondition.len(), 1);
        assert!(action.precondition[0].negated);
        assert_eq!(action.precondition[0].atom.predicate, "fixed");
    }

    #[test]
    fn test_forall_when_becomes_conditional_effect() {
        let task = toy_task(
            "(define (domain t)
               (:predicates (holds ?x) (marked ?x) (tick))
               (:action sweep :parameters ()
                 :effect (and (tick)
                              (forall (?x) (when (holds ?x) (marked ?x))))))",
            "(define (problem i) (:domain t) (:objects o) (:init) (:goal (tick)))",
        );
        let action = &task.actions[0];
        assert_eq!(action.effects.len(), 1);
        assert_eq!(action.conditional.len(), 1);
        let ce = &action.conditional[0];
        assert_eq!(ce.parameters, vec!["x".to_string()]);
        assert_eq!(ce.condition.len(), 1);
        assert_eq!(ce.effects.len(), 1);
    }

    #[test]
    fn test_derived_predicate_in_effect_rejected() {
        let domain = parse_domain(
            "(define (domain t)
               (:predicates (p ?x) (d ?x))
               (:derived (d ?x) (p ?x))
               (:action a :parameters (?x) :precondition (p ?x) :effect (d ?x)))",
        )
        .unwrap();
        let problem =
            parse_problem("(define (problem i) (:domain t) (:objects o) (:init) (:goal (p o)))")
                .unwrap();
        assert!(matches!(
            normalize(&domain, &problem),
            Err(PlannerError::InvalidTask(_))
        ));
    }
}
