//! PDDL front half: surface parsing, normalisation, and lowering into
//! the indexed task representation the search core consumes.

pub mod ast;
pub mod ir;
pub mod lower;
pub mod normalize;
pub mod parser;

pub use ir::{IrPool, Kind, Problem};

use crate::error::PlannerResult;

/// Parse, normalise, and lower a domain/problem pair.
pub fn load_task(domain_text: &str, problem_text: &str) -> PlannerResult<Problem> {
    let domain = parser::parse_domain(domain_text)?;
    let problem = parser::parse_problem(problem_text)?;
    let normalized = normalize::normalize(&domain, &problem)?;
    lower::lower(&normalized)
}

/// Load a task from files on disk.
pub fn load_task_from_files(
    domain_path: &std::path::Path,
    problem_path: &std::path::Path,
) -> PlannerResult<Problem> {
    let domain_text = std::fs::read_to_string(domain_path)?;
    let problem_text = std::fs::read_to_string(problem_path)?;
    load_task(&domain_text, &problem_text)
}
