//! # Groundplan Planning Toolkit
//!
//! A classical-planning toolkit: it reads PDDL domain/problem
//! descriptions and searches the ground state space for a plan that
//! satisfies the goal, using the novelty-driven iterated-width family
//! of algorithms.
//!
//! ## Pipeline Architecture
//!
//! ```text
//! PDDL Domain + Problem
//!     |
//! [Parser]             -> surface AST
//!     |
//! [Normalisation]      -> typing compiled away, effects flattened,
//!     |                   positive normal form with dual predicates
//! [Lowering]           -> indexed task (hash-consed IR pool)
//!     |
//! [Grounding]          -> consistency graphs, binding generation,
//!     |                   delete-relaxed exploration, match trees
//! [Search]             -> BrFS / IW(k) / SIW over interned states
//!     |
//! Plan
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use groundplan::{Planner, SiwOptions, EventMode, SearchStatus};
//!
//! let mut planner = Planner::from_files(
//!     domain_path, problem_path, /* grounded */ true, EventMode::Default)?;
//! let result = planner.solve_siw(&SiwOptions::default())?;
//! if result.status == SearchStatus::Solved {
//!     print!("{}", planner.render_plan(&result.plan.unwrap()));
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `pddl` | Parser, normalisation, lowering, IR pool |
//! | `intern` | Content-addressed slot table, sequence trees |
//! | `state` | State store and dense states |
//! | `grounding` | Assignment sets, consistency graphs, KPKC, grounder |
//! | `match_tree` | Discrimination-tree index over ground elements |
//! | `applicability` | Grounded/lifted applicable-action generators |
//! | `axioms` | Stratification and fixpoint axiom evaluators |
//! | `repository` | Initial state and action application |
//! | `novelty` | k-ary atom-tuple novelty table |
//! | `search` | BrFS, IW, SIW, event handlers, statistics |

pub mod applicability;
pub mod axioms;
pub mod bitset;
pub mod config;
pub mod error;
pub mod grounding;
pub mod intern;
pub mod match_tree;
pub mod novelty;
pub mod pddl;
pub mod plan;
pub mod planner;
pub mod repository;
pub mod search;
pub mod state;

// Re-export the types most callers need.
pub use config::Config;
pub use error::{PlannerError, PlannerResult};
pub use pddl::{load_task, load_task_from_files, Problem};
pub use plan::Plan;
pub use planner::{Planner, SearchContext};
pub use search::{
    EventMode, IwOptions, IwResult, SearchOptions, SearchResult, SearchStatus, SiwOptions,
    SiwResult,
};
pub use state::{DenseState, State};
