//! Marketing Agent Swarm — CLI
//!
//! Runs one swarm pass for a goal and prints the output directory.
//!
//! Usage:
//!   swarm run --goal "Launch a newsletter"
//!   swarm run --goal "..." --inputs inputs.json --constraints constraints.txt
//!   swarm run --goal "..." --config config/config.toml --prompts prompts
//!
//! `OPENAI_API_KEY` (and optionally `OPENAI_BASE_URL`) are read from the
//! environment or a `.env` file in the working directory.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use swarm_config::SwarmConfig;
use swarm_contracts::{error::SwarmResult, run::RunInputs};
use swarm_marketing::{
    inputs::{read_constraints, read_inputs},
    Orchestrator,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Marketing agent swarm.
///
/// Six role-specialized agents draft, review and revise a marketing bundle
/// for a single goal.
#[derive(Parser)]
#[command(
    name = "swarm",
    about = "Marketing agent swarm orchestrator",
    long_about = "Runs researcher, strategist, copywriter, channel manager, analyst and\n\
                  reviser agents against a goal and writes the resulting bundle to disk."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute one run and print its output directory.
    Run {
        /// The marketing objective.
        #[arg(long)]
        goal: String,
        /// JSON file holding a free-form inputs object.
        #[arg(long)]
        inputs: Option<PathBuf>,
        /// Text file with one constraint per line.
        #[arg(long)]
        constraints: Option<PathBuf>,
        /// TOML configuration file.
        #[arg(long, default_value = "config/config.toml")]
        config: PathBuf,
        /// Directory holding the agents' system prompts.
        #[arg(long, default_value = "prompts")]
        prompts: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Diagnostics go to stderr so stdout carries only the output directory.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run {
            goal,
            inputs,
            constraints,
            config,
            prompts,
        } => run(goal, inputs.as_deref(), constraints.as_deref(), &config, &prompts),
    };

    match result {
        Ok(out_dir) => {
            println!("{}", out_dir.display());
        }
        Err(e) => {
            eprintln!("swarm error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            std::process::exit(1);
        }
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

fn run(
    goal: String,
    inputs: Option<&Path>,
    constraints: Option<&Path>,
    config_path: &Path,
    prompts_dir: &Path,
) -> SwarmResult<PathBuf> {
    let config = SwarmConfig::from_file(config_path)?;

    let mut run_inputs = RunInputs::new(goal);
    if let Some(path) = inputs {
        run_inputs.inputs = read_inputs(path)?;
    }
    if let Some(path) = constraints {
        run_inputs.constraints = read_constraints(path)?;
    }

    let orchestrator = Orchestrator::from_config(config, prompts_dir)?;
    let out_dir = orchestrator.run(&run_inputs)?;

    info!(out_dir = %out_dir.display(), "run finished");
    Ok(out_dir)
}
