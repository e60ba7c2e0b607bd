//! Lifted-to-ground pipeline: assignment sets, the static consistency
//! graph, k-partite clique enumeration, satisfying-binding generation,
//! and the memoising grounder with its delete-relaxed pre-exploration.

pub mod assignment_set;
pub mod bindings;
pub mod consistency_graph;
pub mod grounder;
pub mod kpkc;

pub use assignment_set::{Assignment, AssignmentSet};
pub use bindings::{BindingGenerator, Bindings, EvalContext};
pub use consistency_graph::StaticConsistencyGraph;
pub use grounder::{
    delete_relaxed_explore, eval_ground_expr, DefaultGrounderEventHandler, DeleteRelaxedResult,
    GroundAction, GroundAxiom, GroundCondition, GroundConditionalEffect, GroundEffect,
    GroundNumericConstraint, GroundNumericEffect, GroundNumericExpr, GroundSimpleEffect, Grounder,
    GrounderEventHandler, GrounderStatistics,
};
pub use kpkc::KCliqueIter;
