//! # Satisfying-Binding Generation
//!
//! Given a conjunctive condition and a state, enumerate every object
//! tuple that makes all of the condition's literals true. Nullary and
//! unary conditions are answered directly; the general case restricts
//! the static consistency graph by the state's fluent/derived assignment
//! sets and enumerates k-cliques, each of which maps to one binding.
//!
//! Every candidate is verified literal-by-literal before it is yielded,
//! so the contract is exact: a yielded binding satisfies the condition,
//! and every satisfying binding is yielded exactly once.

use crate::bitset::Bitset;
use crate::grounding::assignment_set::{Assignment, AssignmentSet};
use crate::grounding::consistency_graph::StaticConsistencyGraph;
use crate::grounding::kpkc::KCliqueIter;
use crate::pddl::ir::{
    ConjunctiveCondition, GroundLiteral, IrPool, Kind, NumericConstraint, NumericExpr, Problem,
};
use crate::state::DenseState;

/// Read-only view of everything needed to evaluate conditions in a
/// state: the pool for atom lookup, the fixed static extension, and the
/// dense fluent/derived/numeric state.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub pool: &'a IrPool,
    pub statics: &'a Bitset,
    pub static_values: &'a [(u32, f64)],
    pub dense: &'a DenseState,
}

impl EvalContext<'_> {
    /// Truth of a ground atom by kind. Atoms that were never interned
    /// cannot be true.
    pub fn ground_atom_holds(&self, kind: Kind, atom: u32) -> bool {
        match kind {
            Kind::Static => self.statics.get(atom as usize),
            Kind::Fluent => self.dense.fluent.get(atom as usize),
            Kind::Derived => self.dense.derived.get(atom as usize),
        }
    }

    pub fn ground_literal_holds(&self, kind: Kind, literal: GroundLiteral) -> bool {
        self.ground_atom_holds(kind, literal.atom) != literal.negated
    }

    /// Truth of a lifted literal under a binding, without interning.
    pub fn literal_holds(&self, kind: Kind, literal_index: u32, binding: &[u32]) -> bool {
        let literal = self.pool.literals.get(kind).get(literal_index);
        let objects = Problem::ground_terms(&literal.terms, binding);
        let member = self
            .pool
            .find_ground_atom(kind, literal.predicate, &objects)
            .is_some_and(|atom| self.ground_atom_holds(kind, atom));
        member != literal.negated
    }

    /// Value of a ground function term: the state tuple first, then the
    /// fixed static table.
    pub fn fterm_value(&self, fterm: u32) -> Option<f64> {
        self.dense.numeric_value(fterm).or_else(|| {
            self.static_values
                .iter()
                .find(|(f, _)| *f == fterm)
                .map(|(_, v)| *v)
        })
    }

    pub fn numeric_expr_value(&self, expr: &NumericExpr, binding: &[u32]) -> Option<f64> {
        match expr {
            NumericExpr::Constant(value) => Some(*value),
            NumericExpr::Apply(function, terms) => {
                let objects = Problem::ground_terms(terms, binding);
                let fterm = self.pool.fterms.find(&(*function, objects))?;
                self.fterm_value(fterm)
            }
        }
    }

    /// A constraint over an undefined function value does not hold.
    pub fn constraint_holds(&self, constraint: &NumericConstraint, binding: &[u32]) -> bool {
        let lhs = self.numeric_expr_value(&constraint.lhs, binding);
        let rhs = self.numeric_expr_value(&constraint.rhs, binding);
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => constraint.op.eval(lhs, rhs),
            _ => false,
        }
    }

    /// Full verification of a candidate binding against a condition.
    /// With `relaxed`, negated literals and numeric constraints are
    /// treated as satisfied.
    pub fn binding_satisfies(
        &self,
        condition: &ConjunctiveCondition,
        binding: &[u32],
        relaxed: bool,
    ) -> bool {
        let check = |kind: Kind, literals: &[u32]| {
            literals.iter().all(|&literal_index| {
                if relaxed && self.pool.literals.get(kind).get(literal_index).negated {
                    return true;
                }
                self.literal_holds(kind, literal_index, binding)
            })
        };
        check(Kind::Static, &condition.statics)
            && check(Kind::Fluent, &condition.fluents)
            && check(Kind::Derived, &condition.deriveds)
            && (relaxed
                || condition
                    .numerics
                    .iter()
                    .all(|constraint| self.constraint_holds(constraint, binding)))
    }
}

/// Binding generator for one conjunctive condition schema. Holds the
/// static consistency graph; the per-state restriction happens per call.
pub struct BindingGenerator {
    pub condition: ConjunctiveCondition,
    graph: StaticConsistencyGraph,
}

impl BindingGenerator {
    pub fn new(
        pool: &IrPool,
        condition: ConjunctiveCondition,
        static_sets: &AssignmentSet,
    ) -> Self {
        let graph = StaticConsistencyGraph::build(pool, &condition, static_sets);
        BindingGenerator { condition, graph }
    }

    /// Enumerate the bindings of this condition satisfied in the
    /// context's state. The sequence is lazy; dropping it early is fine.
    pub fn bindings<'a>(
        &'a self,
        ctx: EvalContext<'a>,
        fluent_sets: &AssignmentSet,
        derived_sets: &AssignmentSet,
        relaxed: bool,
    ) -> Bindings<'a> {
        match self.condition.arity {
            0 => Bindings::Nullary {
                generator: self,
                ctx,
                relaxed,
                done: false,
            },
            1 => Bindings::Unary {
                generator: self,
                ctx,
                relaxed,
                pos: 0,
            },
            _ => {
                let clique_iter =
                    self.restricted_cliques(ctx, fluent_sets, derived_sets, relaxed);
                Bindings::General {
                    generator: self,
                    ctx,
                    relaxed,
                    cliques: clique_iter,
                }
            }
        }
    }

    /// Restrict the static graph by the state's assignment sets and set
    /// up clique enumeration over the survivors.
    fn restricted_cliques(
        &self,
        ctx: EvalContext<'_>,
        fluent_sets: &AssignmentSet,
        derived_sets: &AssignmentSet,
        relaxed: bool,
    ) -> KCliqueIter {
        let consistent_vertex = |vertex_index: u32| {
            let vertex = self.graph.vertices[vertex_index as usize];
            let assignment = Assignment::unary(vertex.parameter, vertex.object);
            fluent_sets.literals_consistent(
                ctx.pool,
                &self.condition.fluents,
                assignment,
                None,
                relaxed,
            ) && derived_sets.literals_consistent(
                ctx.pool,
                &self.condition.deriveds,
                assignment,
                None,
                relaxed,
            )
        };

        let mut alive = Bitset::with_capacity(self.graph.vertices.len());
        let mut partitions: Vec<Vec<u32>> = Vec::with_capacity(self.condition.arity);
        for members in &self.graph.vertices_by_parameter {
            let surviving: Vec<u32> = members
                .iter()
                .copied()
                .filter(|&v| consistent_vertex(v))
                .collect();
            for &v in &surviving {
                alive.set(v as usize);
            }
            partitions.push(surviving);
        }

        // Edge restriction: keep a static edge iff both endpoints are
        // alive and the joint assignment survives the dynamic sets.
        let mut adjacency = vec![Bitset::with_capacity(self.graph.vertices.len()); self.graph.vertices.len()];
        for &(src_index, dst_index) in &self.graph.edges {
            if !alive.get(src_index as usize) || !alive.get(dst_index as usize) {
                continue;
            }
            let src = self.graph.vertices[src_index as usize];
            let dst = self.graph.vertices[dst_index as usize];
            let pair = Assignment::pair(src.parameter, src.object, dst.parameter, dst.object);
            let keep = fluent_sets.literals_consistent(
                ctx.pool,
                &self.condition.fluents,
                pair,
                None,
                relaxed,
            ) && derived_sets.literals_consistent(
                ctx.pool,
                &self.condition.deriveds,
                pair,
                None,
                relaxed,
            );
            if keep {
                adjacency[src_index as usize].set(dst_index as usize);
                adjacency[dst_index as usize].set(src_index as usize);
            }
        }

        KCliqueIter::new(partitions, adjacency)
    }

    /// Map a clique to the binding it encodes.
    fn clique_to_binding(&self, clique: &[u32]) -> Vec<u32> {
        let mut binding = vec![0u32; self.condition.arity];
        for &vertex_index in clique {
            let vertex = self.graph.vertices[vertex_index as usize];
            binding[vertex.parameter as usize] = vertex.object;
        }
        binding
    }

    pub fn graph(&self) -> &StaticConsistencyGraph {
        &self.graph
    }
}

/// Lazy binding sequence; see [`BindingGenerator::bindings`].
pub enum Bindings<'a> {
    Nullary {
        generator: &'a BindingGenerator,
        ctx: EvalContext<'a>,
        relaxed: bool,
        done: bool,
    },
    Unary {
        generator: &'a BindingGenerator,
        ctx: EvalContext<'a>,
        relaxed: bool,
        pos: usize,
    },
    General {
        generator: &'a BindingGenerator,
        ctx: EvalContext<'a>,
        relaxed: bool,
        cliques: KCliqueIter,
    },
}

impl Iterator for Bindings<'_> {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        match self {
            Bindings::Nullary {
                generator,
                ctx,
                relaxed,
                done,
            } => {
                if *done {
                    return None;
                }
                *done = true;
                let binding = Vec::new();
                ctx.binding_satisfies(&generator.condition, &binding, *relaxed)
                    .then_some(binding)
            }
            Bindings::Unary {
                generator,
                ctx,
                relaxed,
                pos,
            } => {
                let objects = &generator.graph.objects_by_parameter[0];
                while *pos < objects.len() {
                    let binding = vec![objects[*pos]];
                    *pos += 1;
                    if ctx.binding_satisfies(&generator.condition, &binding, *relaxed) {
                        return Some(binding);
                    }
                }
                None
            }
            Bindings::General {
                generator,
                ctx,
                relaxed,
                cliques,
            } => {
                for clique in cliques.by_ref() {
                    let binding = generator.clique_to_binding(&clique);
                    if ctx.binding_satisfies(&generator.condition, &binding, *relaxed) {
                        return Some(binding);
                    }
                }
                None
            }
        }
    }
}
