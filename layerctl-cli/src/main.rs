//! layerctl: attach, detach and maintain the observability layer across a
//! Lambda fleet.
//!
//! # Usage
//!
//! ```text
//! layerctl [--config <path>] [-v] apply [--dry-run] [--json] [--region R] [--account-id ID]
//! layerctl [--config <path>] [-v] plan [--snapshot FILE] [--region R] [--account-id ID]
//! layerctl [--config <path>] [-v] validate
//! layerctl [--config <path>] [-v] list [--snapshot FILE] [--json] [--region R] [--account-id ID]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{apply::ApplyArgs, list::ListArgs, plan::PlanArgs, validate::ValidateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "layerctl",
    version,
    about = "Reconcile the observability layer and its environment across Lambda functions",
    long_about = None,
)]
struct Cli {
    /// Config file (default: ./config.yml, then ~/.layerctl/config.yml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile every selected function.
    Apply(ApplyArgs),

    /// Show the per-function diff apply would make.
    Plan(PlanArgs),

    /// Validate the config file and exit.
    Validate(ValidateArgs),

    /// Table of selected functions and their add-on state.
    List(ListArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Apply(args) => args.run(config),
        Commands::Plan(args) => args.run(config),
        Commands::Validate(args) => args.run(config),
        Commands::List(args) => args.run(config),
    }
}

/// Logs go to stderr; stdout carries only command output.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
