//! # Applicable-Action Generation
//!
//! Two flavours behind one interface. The grounded generator walks the
//! match tree built over the delete-relaxed ground action universe; the
//! lifted generator runs the satisfying-binding generator per action
//! schema and grounds each yielded binding on the fly. For every
//! reachable state both produce the same set of ground actions.

use crate::bitset::Bitset;
use crate::error::PlannerResult;
use crate::grounding::{AssignmentSet, BindingGenerator, EvalContext, Grounder};
use crate::match_tree::{MatchElement, MatchTree, MatchTreeStatistics};
use crate::pddl::ir::{Kind, Problem};
use crate::state::DenseState;

pub enum ApplicableActionGenerator {
    Grounded(GroundedApplicableActions),
    Lifted(LiftedApplicableActions),
}

impl ApplicableActionGenerator {
    /// Collect the ground actions applicable in `dense` into `out`,
    /// deterministically for a given state and generator structure.
    pub fn collect_applicable(
        &self,
        dense: &DenseState,
        problem: &mut Problem,
        grounder: &mut Grounder,
        statics: &Bitset,
        out: &mut Vec<u32>,
    ) -> PlannerResult<()> {
        out.clear();
        match self {
            ApplicableActionGenerator::Grounded(generator) => {
                out.extend(generator.iter(dense, &problem.static_values));
                Ok(())
            }
            ApplicableActionGenerator::Lifted(generator) => {
                generator.collect(dense, problem, grounder, statics, out)
            }
        }
    }
}

/// Match-tree walker over the delete-relaxed action universe.
pub struct GroundedApplicableActions {
    tree: MatchTree,
}

impl GroundedApplicableActions {
    pub fn new(grounder: &Grounder, action_ids: &[u32]) -> Self {
        let elements = action_ids
            .iter()
            .map(|&id| MatchElement {
                id,
                condition: grounder.action(id).precondition.clone(),
            })
            .collect();
        GroundedApplicableActions {
            tree: MatchTree::build(elements),
        }
    }

    /// Lazily yield the applicable action ids in tree order.
    pub fn iter<'a>(
        &'a self,
        dense: &'a DenseState,
        static_values: &'a [(u32, f64)],
    ) -> impl Iterator<Item = u32> + 'a {
        self.tree.applicable(dense, static_values)
    }

    pub fn statistics(&self) -> &MatchTreeStatistics {
        self.tree.statistics()
    }
}

/// On-the-fly generator: satisfying bindings per schema, grounded as
/// they are yielded.
pub struct LiftedApplicableActions {
    generators: Vec<BindingGenerator>,
}

impl LiftedApplicableActions {
    pub fn new(problem: &Problem, static_sets: &AssignmentSet) -> Self {
        let generators = problem
            .actions
            .iter()
            .map(|action| {
                BindingGenerator::new(&problem.pool, action.precondition.clone(), static_sets)
            })
            .collect();
        LiftedApplicableActions { generators }
    }

    fn collect(
        &self,
        dense: &DenseState,
        problem: &mut Problem,
        grounder: &mut Grounder,
        statics: &Bitset,
        out: &mut Vec<u32>,
    ) -> PlannerResult<()> {
        let Problem {
            ref mut pool,
            ref actions,
            ref static_values,
            ..
        } = *problem;

        let fluent_sets =
            AssignmentSet::build(pool, Kind::Fluent, dense.fluent.iter_ones().map(|a| a as u32));
        let derived_sets = AssignmentSet::build(
            pool,
            Kind::Derived,
            dense.derived.iter_ones().map(|a| a as u32),
        );

        let mut pending: Vec<(usize, Vec<u32>)> = Vec::new();
        {
            let ctx = EvalContext {
                pool,
                statics,
                static_values,
                dense,
            };
            for (schema_index, generator) in self.generators.iter().enumerate() {
                for binding in generator.bindings(ctx, &fluent_sets, &derived_sets, false) {
                    pending.push((schema_index, binding));
                }
            }
        }

        for (schema_index, binding) in pending {
            let schema = &actions[schema_index];
            if let Some(id) =
                grounder.ground_action(pool, schema, &binding, statics, static_values)?
            {
                out.push(id);
            }
        }
        Ok(())
    }
}
