//! `layerctl plan`: unified diff of what apply would change.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use layerctl_reconcile::{pipeline, Plan};

use super::{load_config, override_account, SourceArgs};

/// Arguments for `layerctl plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

impl PlanArgs {
    pub fn run(self, config_path: Option<&Path>) -> Result<()> {
        let config = override_account(load_config(config_path)?, self.source.account_id.clone());
        let operation = config.operation;
        let fleet = self.source.open()?;

        let planned =
            pipeline::plan(config, &fleet).with_context(|| format!("planning {operation} failed"))?;

        let mut changes = 0;
        for p in &planned {
            match (&p.plan, &p.diff) {
                (Plan::Update(_), Some(diff)) => {
                    changes += 1;
                    print!("{}", diff.unified_diff);
                    if !diff.unified_diff.ends_with('\n') {
                        println!();
                    }
                }
                (Plan::Skip(reason), _) => println!("# {}: skipped, {reason}", p.record.name),
                _ => {}
            }
        }

        if changes == 0 {
            println!("No differences for {operation} ({} selected).", planned.len());
        }
        Ok(())
    }
}
