//! # Planner Facade
//!
//! Wires a lowered task into a runnable search context: stratification,
//! static assignment sets, the grounder (with delete-relaxed
//! pre-exploration and match trees on the grounded path), the axiom
//! evaluator, and the state repository. One context owns everything a
//! single search run touches; two contexts in one process are fully
//! independent.

use crate::applicability::{
    ApplicableActionGenerator, GroundedApplicableActions, LiftedApplicableActions,
};
use crate::axioms::{
    stratify, AxiomEvaluator, AxiomEvaluatorEventHandler, DebugAxiomEvaluatorEventHandler,
    DefaultAxiomEvaluatorEventHandler, GroundedAxiomEvaluator, LiftedAxiomEvaluator,
};
use crate::bitset::Bitset;
use crate::error::PlannerResult;
use crate::grounding::{
    delete_relaxed_explore, AssignmentSet, BindingGenerator, DefaultGrounderEventHandler,
    Grounder, GrounderEventHandler, GrounderStatistics,
};
use crate::pddl::ir::{Kind, Problem};
use crate::plan::Plan;
use crate::repository::StateRepository;
use crate::search::events::EventMode;
use crate::search::iw::{find_solution_brfs_for_goal, find_solution_iw_for_goal, IwOptions, IwResult};
use crate::search::siw::{find_solution_siw, SiwOptions, SiwResult};
use crate::search::{GoalChecker, SearchOptions, SearchResult};
use crate::state::{DenseState, State};

/// Everything one search run owns.
pub struct SearchContext {
    pub problem: Problem,
    pub grounder: Grounder,
    pub generator: ApplicableActionGenerator,
    pub repository: StateRepository,
    applicable_scratch: Vec<u32>,
}

impl SearchContext {
    /// Build a context. `grounded` selects the match-tree generators
    /// over the delete-relaxed universe; otherwise actions and axioms
    /// are bound on the fly.
    pub fn new(mut problem: Problem, grounded: bool, event_mode: EventMode) -> PlannerResult<Self> {
        let stratification = stratify(&problem)?;

        let mut statics = Bitset::new();
        for &atom in &problem.initial_static_atoms {
            statics.set(atom as usize);
        }
        let static_sets = AssignmentSet::build(
            &problem.pool,
            Kind::Static,
            problem.initial_static_atoms.iter().copied(),
        );

        let grounder_handler: Box<dyn GrounderEventHandler> = match event_mode {
            EventMode::Debug => Box::new(crate::grounding::grounder::DebugGrounderEventHandler::default()),
            _ => Box::new(DefaultGrounderEventHandler::default()),
        };
        let mut grounder = Grounder::new(grounder_handler);

        let axiom_handler = || -> Box<dyn AxiomEvaluatorEventHandler> {
            match event_mode {
                EventMode::Debug => Box::new(DebugAxiomEvaluatorEventHandler::default()),
                _ => Box::new(DefaultAxiomEvaluatorEventHandler::default()),
            }
        };

        let (generator, evaluator) = if grounded {
            let action_generators: Vec<BindingGenerator> = problem
                .actions
                .iter()
                .map(|action| {
                    BindingGenerator::new(&problem.pool, action.precondition.clone(), &static_sets)
                })
                .collect();
            let axiom_generators: Vec<BindingGenerator> = problem
                .axioms
                .iter()
                .map(|axiom| {
                    BindingGenerator::new(&problem.pool, axiom.body.clone(), &static_sets)
                })
                .collect();

            let relaxed = delete_relaxed_explore(
                &mut problem,
                &mut grounder,
                &action_generators,
                &axiom_generators,
                &statics,
            )?;

            let generator = ApplicableActionGenerator::Grounded(GroundedApplicableActions::new(
                &grounder,
                &relaxed.action_ids,
            ));
            let evaluator = if problem.axioms.is_empty() {
                AxiomEvaluator::Empty
            } else {
                AxiomEvaluator::Grounded(GroundedAxiomEvaluator::new(
                    &stratification,
                    &grounder,
                    &relaxed.axiom_ids,
                    axiom_handler(),
                ))
            };
            (generator, evaluator)
        } else {
            let generator = ApplicableActionGenerator::Lifted(LiftedApplicableActions::new(
                &problem,
                &static_sets,
            ));
            let evaluator = if problem.axioms.is_empty() {
                AxiomEvaluator::Empty
            } else {
                AxiomEvaluator::Lifted(LiftedAxiomEvaluator::new(
                    &problem,
                    stratification,
                    &static_sets,
                    axiom_handler(),
                ))
            };
            (generator, evaluator)
        };

        let repository = StateRepository::new(&problem, evaluator);
        Ok(SearchContext {
            problem,
            grounder,
            generator,
            repository,
            applicable_scratch: Vec::new(),
        })
    }

    pub fn initial_state(&mut self) -> PlannerResult<State> {
        self.repository
            .initial_state(&mut self.problem, &mut self.grounder)
    }

    pub fn unpack(&self, state: State, dense: &mut DenseState) {
        self.repository.unpack(state, dense);
    }

    /// Fill `out` with the ground actions applicable in `dense`.
    pub fn applicable_actions(
        &mut self,
        dense: &DenseState,
        out: &mut Vec<u32>,
    ) -> PlannerResult<()> {
        self.generator.collect_applicable(
            dense,
            &mut self.problem,
            &mut self.grounder,
            self.repository.statics(),
            out,
        )
    }

    /// Applicable actions of a packed state, as ids.
    pub fn applicable_actions_of(&mut self, state: State) -> PlannerResult<Vec<u32>> {
        let mut dense = DenseState::new();
        self.repository.unpack(state, &mut dense);
        let mut out = std::mem::take(&mut self.applicable_scratch);
        self.applicable_actions(&dense, &mut out)?;
        let result = out.clone();
        self.applicable_scratch = out;
        Ok(result)
    }

    pub fn apply(&mut self, state: State, action_id: u32) -> PlannerResult<(State, f64)> {
        let action = self.grounder.action(action_id).clone();
        self.repository
            .apply(state, &action, &mut self.problem, &mut self.grounder)
    }

    pub fn fluent_atoms(&self, state: State) -> Vec<u32> {
        self.repository.store().fluent_atoms(state)
    }

    pub fn state(&self, index: u32) -> State {
        self.repository.store().get(index)
    }

    pub fn num_states(&self) -> usize {
        self.repository.store().num_states()
    }

    pub fn goal_checker(&self) -> GoalChecker {
        GoalChecker::new(&self.problem, self.repository.statics())
    }

    pub fn grounder_statistics(&self) -> &GrounderStatistics {
        self.grounder.statistics()
    }

    pub fn render_plan(&self, plan: &Plan) -> String {
        plan.render(&self.problem, &self.grounder)
    }
}

/// Thin front door used by the binary and the integration tests.
pub struct Planner {
    context: SearchContext,
}

impl Planner {
    pub fn from_text(
        domain_text: &str,
        problem_text: &str,
        grounded: bool,
        event_mode: EventMode,
    ) -> PlannerResult<Self> {
        let problem = crate::pddl::load_task(domain_text, problem_text)?;
        Ok(Planner {
            context: SearchContext::new(problem, grounded, event_mode)?,
        })
    }

    pub fn from_files(
        domain_path: &std::path::Path,
        problem_path: &std::path::Path,
        grounded: bool,
        event_mode: EventMode,
    ) -> PlannerResult<Self> {
        let problem = crate::pddl::load_task_from_files(domain_path, problem_path)?;
        Ok(Planner {
            context: SearchContext::new(problem, grounded, event_mode)?,
        })
    }

    pub fn context(&mut self) -> &mut SearchContext {
        &mut self.context
    }

    pub fn problem(&self) -> &Problem {
        &self.context.problem
    }

    pub fn solve_brfs(&mut self, options: &SearchOptions) -> PlannerResult<SearchResult> {
        find_solution_brfs_for_goal(&mut self.context, options)
    }

    pub fn solve_iw(&mut self, options: &IwOptions) -> PlannerResult<IwResult> {
        find_solution_iw_for_goal(&mut self.context, options)
    }

    pub fn solve_siw(&mut self, options: &SiwOptions) -> PlannerResult<SiwResult> {
        find_solution_siw(&mut self.context, options)
    }

    pub fn render_plan(&self, plan: &Plan) -> String {
        self.context.render_plan(plan)
    }
}
