//! # Axiom Stratification and Evaluation
//!
//! Derived predicates are closed under the axiom set after every action
//! application. Soundness of negation requires stratification: axioms
//! are layered so that a derived predicate negated in a body is fully
//! computed in an earlier layer. Dependencies between derived predicates
//! form a graph whose strongly connected components (Tarjan's algorithm)
//! become evaluation layers in topological order; a negative edge inside
//! a component means no stratification exists and construction fails.
//!
//! Within one layer the evaluator runs the applicable-axiom generator to
//! a fixpoint: grounded (match tree per layer over the delete-relaxed
//! axiom universe) or lifted (binding generation per axiom schema). Both
//! atom sets are monotone and finite, so each layer terminates with the
//! unique least fixpoint.

use crate::bitset::Bitset;
use crate::error::{PlannerError, PlannerResult};
use crate::grounding::{AssignmentSet, BindingGenerator, EvalContext, Grounder};
use crate::match_tree::{MatchElement, MatchTree, MatchTreeStatistics};
use crate::pddl::ir::{Kind, Problem};
use crate::state::DenseState;
use serde::Serialize;

/// Evaluation layers over derived predicates, plus each axiom schema's
/// layer assignment.
#[derive(Debug, Clone, Default)]
pub struct Stratification {
    /// Derived predicate indices per layer, dependency-first.
    pub strata: Vec<Vec<u32>>,
    /// Layer index per axiom schema.
    pub axiom_strata: Vec<usize>,
}

impl Stratification {
    pub fn num_strata(&self) -> usize {
        self.strata.len()
    }
}

/// Compute the stratification, or fail if a derived predicate depends
/// negatively on its own component.
pub fn stratify(problem: &Problem) -> PlannerResult<Stratification> {
    let num_predicates = problem.pool.predicates.get(Kind::Derived).len();
    if problem.axioms.is_empty() {
        return Ok(Stratification::default());
    }

    // head -> (body predicate, negated) edges.
    let mut edges: Vec<Vec<(u32, bool)>> = vec![Vec::new(); num_predicates];
    for axiom in &problem.axioms {
        let head = problem
            .pool
            .literals
            .get(Kind::Derived)
            .get(axiom.head)
            .predicate;
        for &literal_index in &axiom.body.deriveds {
            let literal = problem.pool.literals.get(Kind::Derived).get(literal_index);
            edges[head as usize].push((literal.predicate, literal.negated));
        }
    }

    let components = tarjan_sccs(num_predicates, &edges);

    // Component id per predicate; components arrive dependency-first.
    let mut component_of = vec![0usize; num_predicates];
    for (id, members) in components.iter().enumerate() {
        for &predicate in members {
            component_of[predicate as usize] = id;
        }
    }

    // Negative edge inside one component: not stratifiable.
    for (head, deps) in edges.iter().enumerate() {
        for &(body, negated) in deps {
            if negated && component_of[head] == component_of[body as usize] {
                let name = problem.pool.predicate(Kind::Derived, body).name.clone();
                return Err(PlannerError::Stratification(name));
            }
        }
    }

    let mut axiom_strata = Vec::with_capacity(problem.axioms.len());
    for axiom in &problem.axioms {
        let head = problem
            .pool
            .literals
            .get(Kind::Derived)
            .get(axiom.head)
            .predicate;
        axiom_strata.push(component_of[head as usize]);
    }

    Ok(Stratification {
        strata: components,
        axiom_strata,
    })
}

/// Tarjan's strongly connected components; emits components in
/// dependency-first (reverse finishing) order.
fn tarjan_sccs(num_nodes: usize, edges: &[Vec<(u32, bool)>]) -> Vec<Vec<u32>> {
    struct Tarjan<'a> {
        edges: &'a [Vec<(u32, bool)>],
        index: Vec<Option<u32>>,
        lowlink: Vec<u32>,
        on_stack: Vec<bool>,
        stack: Vec<u32>,
        next_index: u32,
        components: Vec<Vec<u32>>,
    }

    impl Tarjan<'_> {
        fn visit(&mut self, node: u32) {
            self.index[node as usize] = Some(self.next_index);
            self.lowlink[node as usize] = self.next_index;
            self.next_index += 1;
            self.stack.push(node);
            self.on_stack[node as usize] = true;

            for &(succ, _) in &self.edges[node as usize] {
                if self.index[succ as usize].is_none() {
                    self.visit(succ);
                    self.lowlink[node as usize] =
                        self.lowlink[node as usize].min(self.lowlink[succ as usize]);
                } else if self.on_stack[succ as usize] {
                    self.lowlink[node as usize] = self.lowlink[node as usize]
                        .min(self.index[succ as usize].unwrap_or(u32::MAX));
                }
            }

            if Some(self.lowlink[node as usize]) == self.index[node as usize] {
                let mut component = Vec::new();
                loop {
                    let member = self.stack.pop().expect("tarjan stack underflow");
                    self.on_stack[member as usize] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                component.sort_unstable();
                self.components.push(component);
            }
        }
    }

    let mut tarjan = Tarjan {
        edges,
        index: vec![None; num_nodes],
        lowlink: vec![0; num_nodes],
        on_stack: vec![false; num_nodes],
        stack: Vec::new(),
        next_index: 0,
        components: Vec::new(),
    };
    for node in 0..num_nodes as u32 {
        if tarjan.index[node as usize].is_none() {
            tarjan.visit(node);
        }
    }
    tarjan.components
}

/// Counters and match-tree build records for the axiom evaluator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AxiomEvaluatorStatistics {
    pub match_tree_statistics: Vec<MatchTreeStatistics>,
    pub num_evaluations: u64,
    pub num_fixpoint_iterations: u64,
}

/// Observer surface for axiom evaluation.
pub trait AxiomEvaluatorEventHandler {
    fn on_finish_build_match_tree(&mut self, statistics: &MatchTreeStatistics);
    fn on_evaluate(&mut self, fixpoint_iterations: u64);
    fn statistics(&self) -> &AxiomEvaluatorStatistics;
}

#[derive(Debug, Default)]
pub struct DefaultAxiomEvaluatorEventHandler {
    statistics: AxiomEvaluatorStatistics,
}

impl AxiomEvaluatorEventHandler for DefaultAxiomEvaluatorEventHandler {
    fn on_finish_build_match_tree(&mut self, statistics: &MatchTreeStatistics) {
        self.statistics.match_tree_statistics.push(statistics.clone());
    }

    fn on_evaluate(&mut self, fixpoint_iterations: u64) {
        self.statistics.num_evaluations += 1;
        self.statistics.num_fixpoint_iterations += fixpoint_iterations;
    }

    fn statistics(&self) -> &AxiomEvaluatorStatistics {
        &self.statistics
    }
}

#[derive(Debug, Default)]
pub struct DebugAxiomEvaluatorEventHandler {
    statistics: AxiomEvaluatorStatistics,
}

impl AxiomEvaluatorEventHandler for DebugAxiomEvaluatorEventHandler {
    fn on_finish_build_match_tree(&mut self, statistics: &MatchTreeStatistics) {
        tracing::debug!(
            elements = statistics.num_elements,
            atom_nodes = statistics.num_atom_nodes,
            millis = statistics.construction_millis,
            "built axiom match tree"
        );
        self.statistics.match_tree_statistics.push(statistics.clone());
    }

    fn on_evaluate(&mut self, fixpoint_iterations: u64) {
        tracing::trace!(fixpoint_iterations, "axiom evaluation finished");
        self.statistics.num_evaluations += 1;
        self.statistics.num_fixpoint_iterations += fixpoint_iterations;
    }

    fn statistics(&self) -> &AxiomEvaluatorStatistics {
        &self.statistics
    }
}

/// Closes the derived atoms of a dense state under the axiom set.
pub enum AxiomEvaluator {
    /// No axioms: evaluation is the identity.
    Empty,
    Grounded(GroundedAxiomEvaluator),
    Lifted(LiftedAxiomEvaluator),
}

impl AxiomEvaluator {
    /// Close `dense.derived` (assumed cleared by the caller) under the
    /// axioms, stratum by stratum.
    pub fn evaluate(
        &mut self,
        dense: &mut DenseState,
        problem: &mut Problem,
        grounder: &mut Grounder,
        statics: &Bitset,
    ) -> PlannerResult<()> {
        match self {
            AxiomEvaluator::Empty => Ok(()),
            AxiomEvaluator::Grounded(evaluator) => {
                evaluator.evaluate(dense, grounder, &problem.static_values);
                Ok(())
            }
            AxiomEvaluator::Lifted(evaluator) => {
                evaluator.evaluate(dense, problem, grounder, statics)
            }
        }
    }
}

/// Match-tree evaluator over the delete-relaxed ground axiom universe,
/// one tree per stratum.
pub struct GroundedAxiomEvaluator {
    partitions: Vec<MatchTree>,
    event_handler: Box<dyn AxiomEvaluatorEventHandler>,
    scratch: Vec<u32>,
}

impl GroundedAxiomEvaluator {
    /// Partition the ground axioms by their schema's stratum and build
    /// one match tree per layer.
    pub fn new(
        stratification: &Stratification,
        grounder: &Grounder,
        axiom_ids: &[u32],
        mut event_handler: Box<dyn AxiomEvaluatorEventHandler>,
    ) -> Self {
        let mut layers: Vec<Vec<MatchElement>> = vec![Vec::new(); stratification.num_strata()];
        for &id in axiom_ids {
            let axiom = grounder.axiom(id);
            let stratum = stratification.axiom_strata[axiom.schema as usize];
            layers[stratum].push(MatchElement {
                id,
                condition: axiom.precondition.clone(),
            });
        }

        let mut partitions = Vec::with_capacity(layers.len());
        for elements in layers {
            let tree = MatchTree::build(elements);
            event_handler.on_finish_build_match_tree(tree.statistics());
            partitions.push(tree);
        }

        GroundedAxiomEvaluator {
            partitions,
            event_handler,
            scratch: Vec::new(),
        }
    }

    pub fn evaluate(
        &mut self,
        dense: &mut DenseState,
        grounder: &Grounder,
        static_values: &[(u32, f64)],
    ) {
        let mut iterations = 0u64;
        for tree in &self.partitions {
            loop {
                iterations += 1;
                self.scratch.clear();
                self.scratch.extend(tree.applicable(dense, static_values));

                let mut changed = false;
                for &id in &self.scratch {
                    let head = grounder.axiom(id).head;
                    if !dense.derived.get(head as usize) {
                        dense.derived.set(head as usize);
                        changed = true;
                    }
                }
                if !changed {
                    break;
                }
            }
        }
        self.event_handler.on_evaluate(iterations);
    }

    pub fn statistics(&self) -> &AxiomEvaluatorStatistics {
        self.event_handler.statistics()
    }
}

/// On-the-fly evaluator: per stratum, generate satisfying bindings for
/// each axiom schema against the current dense state, grounding heads as
/// they are derived.
pub struct LiftedAxiomEvaluator {
    generators: Vec<BindingGenerator>,
    stratification: Stratification,
    event_handler: Box<dyn AxiomEvaluatorEventHandler>,
}

impl LiftedAxiomEvaluator {
    pub fn new(
        problem: &Problem,
        stratification: Stratification,
        static_sets: &AssignmentSet,
        event_handler: Box<dyn AxiomEvaluatorEventHandler>,
    ) -> Self {
        let generators = problem
            .axioms
            .iter()
            .map(|axiom| BindingGenerator::new(&problem.pool, axiom.body.clone(), static_sets))
            .collect();
        LiftedAxiomEvaluator {
            generators,
            stratification,
            event_handler,
        }
    }

    pub fn evaluate(
        &mut self,
        dense: &mut DenseState,
        problem: &mut Problem,
        grounder: &mut Grounder,
        statics: &Bitset,
    ) -> PlannerResult<()> {
        let mut iterations = 0u64;
        let mut pending: Vec<(usize, Vec<u32>)> = Vec::new();

        let Problem {
            ref mut pool,
            ref axioms,
            ref static_values,
            ..
        } = *problem;

        // Fluent atoms are fixed for the whole closure.
        let fluent_sets =
            AssignmentSet::build(pool, Kind::Fluent, dense.fluent.iter_ones().map(|a| a as u32));

        for stratum in 0..self.stratification.num_strata() {
            loop {
                iterations += 1;
                let derived_sets = AssignmentSet::build(
                    pool,
                    Kind::Derived,
                    dense.derived.iter_ones().map(|a| a as u32),
                );

                pending.clear();
                {
                    let ctx = EvalContext {
                        pool,
                        statics,
                        static_values,
                        dense,
                    };
                    for (schema_index, generator) in self.generators.iter().enumerate() {
                        if self.stratification.axiom_strata[schema_index] != stratum {
                            continue;
                        }
                        for binding in generator.bindings(ctx, &fluent_sets, &derived_sets, false) {
                            pending.push((schema_index, binding));
                        }
                    }
                }

                let mut changed = false;
                for (schema_index, binding) in pending.drain(..) {
                    let schema = &axioms[schema_index];
                    if let Some(id) =
                        grounder.ground_axiom(pool, schema, &binding, statics, static_values)?
                    {
                        let head = grounder.axiom(id).head;
                        if !dense.derived.get(head as usize) {
                            dense.derived.set(head as usize);
                            changed = true;
                        }
                    }
                }
                if !changed {
                    break;
                }
            }
        }
        self.event_handler.on_evaluate(iterations);
        Ok(())
    }

    pub fn statistics(&self) -> &AxiomEvaluatorStatistics {
        self.event_handler.statistics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pddl;

    fn problem_with_axioms() -> Problem {
        pddl::load_task(
            "(define (domain dg)
               (:predicates (on ?x ?y) (above ?x ?y) (clear ?x))
               (:derived (above ?x ?y) (on ?x ?y))
               (:derived (above ?x ?z) (and (on ?x ?y) (above ?y ?z)))
               (:action noop :parameters (?x) :precondition (clear ?x) :effect (clear ?x)))",
            "(define (problem p) (:domain dg)
               (:objects a b c)
               (:init (on a b) (on b c) (clear a))
               (:goal (above a c)))",
        )
        .unwrap()
    }

    #[test]
    fn test_recursive_axioms_share_a_stratum() {
        let problem = problem_with_axioms();
        let stratification = stratify(&problem).unwrap();
        assert_eq!(stratification.num_strata(), 1);
        assert_eq!(stratification.axiom_strata, vec![0, 0]);
    }

    #[test]
    fn test_negation_forces_lower_stratum() {
        let problem = pddl::load_task(
            "(define (domain dg)
               (:predicates (p ?x) (d ?x) (alone ?x) (mark ?x))
               (:derived (d ?x) (p ?x))
               (:derived (alone ?x) (not (d ?x)))
               (:action a :parameters (?x) :precondition (alone ?x) :effect (p ?x)))",
            "(define (problem i) (:domain dg) (:objects o) (:init) (:goal (d o)))",
        )
        .unwrap();
        let stratification = stratify(&problem).unwrap();
        assert_eq!(stratification.num_strata(), 2);
        // d's layer must come before alone's.
        let d_stratum = stratification.axiom_strata[0];
        let alone_stratum = stratification.axiom_strata[1];
        assert!(d_stratum < alone_stratum);
    }

    #[test]
    fn test_negative_self_dependency_rejected() {
        let problem = pddl::load_task(
            "(define (domain dg)
               (:predicates (p ?x) (d ?x) (mark ?x))
               (:derived (d ?x) (not (d ?x)))
               (:action a :parameters (?x) :precondition (p ?x) :effect (mark ?x)))",
            "(define (problem i) (:domain dg) (:objects o) (:init) (:goal (d o)))",
        )
        .unwrap();
        assert!(matches!(
            stratify(&problem),
            Err(PlannerError::Stratification(_))
        ));
    }
}
