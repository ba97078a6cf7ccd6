//! `layerctl apply`: reconcile the fleet.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use layerctl_reconcile::{pipeline, FunctionOutcome, RunMode, RunReport};

use super::{connect, load_config, override_account};

/// Arguments for `layerctl apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Compute every change but issue no update calls.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON.
    #[arg(long)]
    pub json: bool,

    /// AWS region (default: from the environment or profile).
    #[arg(long)]
    pub region: Option<String>,

    /// Account ID to template into the variables, skipping the STS lookup.
    #[arg(long)]
    pub account_id: Option<String>,
}

impl ApplyArgs {
    pub fn run(self, config_path: Option<&Path>) -> Result<()> {
        let config = override_account(load_config(config_path)?, self.account_id);
        let operation = config.operation;
        let fleet = connect(self.region)?;

        let mode = if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Apply
        };
        let report = pipeline::run(config, &fleet, mode)
            .with_context(|| format!("{operation} run aborted"))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize run report")?
            );
            return Ok(());
        }
        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &RunReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    if report.functions.is_empty() {
        println!(
            "{prefix}✓ {}: no functions selected ({} scanned)",
            report.operation, report.scanned
        );
        return;
    }

    let verb = if report.dry_run { "to update" } else { "updated" };
    println!(
        "{prefix}✓ {}: {} {verb}, {} unchanged, {} skipped ({} scanned in {}s)",
        report.operation,
        report.changed(),
        report.unchanged(),
        report.skipped(),
        report.scanned,
        (report.finished_at - report.started_at).num_seconds(),
    );

    for f in &report.functions {
        match &f.outcome {
            FunctionOutcome::Updated { layers, variables } => {
                println!("  ✎  {}  ({})", f.function, fields(*layers, *variables))
            }
            FunctionOutcome::WouldUpdate { layers, variables } => {
                println!("  ~  {}  ({})", f.function, fields(*layers, *variables))
            }
            FunctionOutcome::Unchanged => println!("  ·  {}", f.function),
            FunctionOutcome::Skipped { reason } => println!("  -  {}  {reason}", f.function),
        }
    }
}

fn fields(layers: bool, variables: bool) -> &'static str {
    match (layers, variables) {
        (true, true) => "layers, variables",
        (true, false) => "layers",
        (false, true) => "variables",
        (false, false) => "nothing",
    }
}
