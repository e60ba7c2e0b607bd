//! # Groundplan Planner Binary
//!
//! Front-end driver: parse a PDDL domain/problem pair, run serialised
//! iterated width, and write the plan file.
//!
//! ## Usage
//!
//! ```bash
//! groundplan -D domain.pddl -P problem.pddl -O plan.txt -A 2 -G 1 -V 1
//! ```
//!
//! Exit code 0 covers every search outcome, including exhausted and
//! unsolvable runs that produce no plan; exit code 1 means the
//! arguments or the PDDL input were rejected.

use anyhow::Context;
use clap::Parser as ClapParser;
use groundplan::search::SearchOptions;
use groundplan::{Config, EventMode, Planner, SearchStatus, SiwOptions};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, ClapParser)]
#[command(name = "groundplan", about = "Width-based planner for PDDL tasks")]
struct Args {
    /// The path to the PDDL domain file
    #[arg(short = 'D', long = "domain")]
    domain: PathBuf,

    /// The path to the PDDL problem file
    #[arg(short = 'P', long = "problem")]
    problem: PathBuf,

    /// The path to the output plan file
    #[arg(short = 'O', long = "plan")]
    plan: PathBuf,

    /// Maximum IW arity used per SIW subproblem
    #[arg(short = 'A', long = "arity")]
    arity: Option<usize>,

    /// Non-zero selects the grounded applicable-action generator
    #[arg(short = 'G', long = "grounded")]
    grounded: Option<usize>,

    /// Verbosity level (0 quiet, 1 statistics, 2 debug)
    #[arg(short = 'V', long = "verbosity", default_value_t = 0)]
    verbosity: usize,
}

fn init_logging(verbosity: usize, config: &Config) {
    let level = match verbosity {
        0 => config.logging.level.clone(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("groundplan={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();

    let config = Config::load().unwrap_or_else(|error| {
        eprintln!("warning: bad configuration, using defaults: {error}");
        Config::default()
    });
    init_logging(args.verbosity, &config);

    match run(&args, &config) {
        Ok(()) => std::process::exit(0),
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    }
}

fn run(args: &Args, config: &Config) -> anyhow::Result<()> {
    let arity = args.arity.unwrap_or(config.search.max_arity).max(1);
    let grounded = args
        .grounded
        .map_or(config.search.grounded, |value| value != 0);
    let event_mode = match args.verbosity {
        0 | 1 => EventMode::Default,
        _ => EventMode::Debug,
    };

    tracing::info!(
        domain = %args.domain.display(),
        problem = %args.problem.display(),
        grounded,
        arity,
        "loading task"
    );

    let mut planner = Planner::from_files(&args.domain, &args.problem, grounded, event_mode)
        .context("failed to load the planning task")?;

    let options = SiwOptions {
        max_arity: arity,
        search: SearchOptions {
            max_num_states: (config.search.max_num_states > 0)
                .then_some(config.search.max_num_states),
            timeout: (config.search.timeout_seconds > 0)
                .then(|| Duration::from_secs(config.search.timeout_seconds)),
            event_mode,
        },
    };

    let result = planner.solve_siw(&options).context("search failed")?;

    match result.status {
        SearchStatus::Solved => {
            let plan = result.plan.as_ref().expect("a solved run carries a plan");
            std::fs::write(&args.plan, planner.render_plan(plan))
                .with_context(|| format!("cannot write plan file {}", args.plan.display()))?;
            println!(
                "Solved: {} actions, cost {}.",
                plan.len(),
                plan.cost
            );
        }
        SearchStatus::Unsolvable => println!("Unsolvable."),
        SearchStatus::Exhausted => println!("Exhausted without finding a plan."),
        SearchStatus::TimedOut => println!("Timed out."),
    }

    if args.verbosity >= 1 {
        let statistics = serde_json::json!({
            "siw": &result.statistics,
            "max_effective_width": result.statistics.maximum_effective_width(),
            "grounder": planner.context().grounder_statistics(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&statistics)?);
    }

    Ok(())
}
