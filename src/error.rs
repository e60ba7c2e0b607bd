//! Planner Error Types

use thiserror::Error;

/// Errors surfaced by the planning core.
///
/// Search outcomes (solved, exhausted, unsolvable, timed out) are *values*
/// returned by the search entry points, never errors. Everything here is a
/// genuine failure that propagates to the driver.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// I/O error while reading PDDL files or writing the plan
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed PDDL input
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input uses a feature outside the supported fragment
    #[error("Unsupported PDDL feature: {0}")]
    Unsupported(String),

    /// Domain/problem are inconsistent with each other
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// The axiom set admits no stratification
    #[error("Axioms are not stratifiable: derived predicate '{0}' depends negatively on its own stratum")]
    Stratification(String),

    /// An append-only table ran out of 32-bit index space
    #[error("Capacity exhausted: {0}")]
    Capacity(&'static str),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] figment::Error),
}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
