//! `layerctl list`: selected functions and their add-on state.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use layerctl_core::{catalog, FunctionRecord};
use layerctl_reconcile::{layers::find_addon_layer, pipeline, Plan, PlannedFunction, SkipReason};

use super::{load_config, override_account, SourceArgs};

/// Arguments for `layerctl list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(self, config_path: Option<&Path>) -> Result<()> {
        let config = override_account(load_config(config_path)?, self.source.account_id.clone());
        let operation = config.operation;
        let fragment = config.layer_name_fragment.clone();
        let fleet = self.source.open()?;

        let planned =
            pipeline::plan(config, &fleet).context("failed to list selected functions")?;
        let rows: Vec<FunctionState> = planned.iter().map(|p| describe(p, &fragment)).collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize function list")?
            );
            return Ok(());
        }

        print_table(&operation.to_string(), rows);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum AddonState {
    Absent,
    Enabled,
    Disabled,
    Unsupported,
}

#[derive(Debug, Serialize)]
struct FunctionState {
    function: String,
    runtime: Option<String>,
    layer: Option<String>,
    state: AddonState,
    pending: String,
}

#[derive(Tabled)]
struct ListTableRow {
    #[tabled(rename = "function")]
    function: String,
    #[tabled(rename = "runtime")]
    runtime: String,
    #[tabled(rename = "layer")]
    layer: String,
    #[tabled(rename = "state")]
    state: String,
    #[tabled(rename = "pending")]
    pending: String,
}

fn describe(planned: &PlannedFunction, fragment: &str) -> FunctionState {
    let record = &planned.record;
    let state = match &planned.plan {
        Plan::Skip(SkipReason::UnsupportedRuntime { .. }) => AddonState::Unsupported,
        _ => addon_state(record, fragment),
    };
    let pending = match &planned.plan {
        Plan::Update(desired) => match (desired.layers.is_some(), desired.variables.is_some()) {
            (true, true) => "layers, variables".to_string(),
            (true, false) => "layers".to_string(),
            _ => "variables".to_string(),
        },
        Plan::Unchanged => "none".to_string(),
        Plan::Skip(reason) => format!("skip: {reason}"),
    };
    FunctionState {
        function: record.name.0.clone(),
        runtime: record.runtime.clone(),
        layer: find_addon_layer(record, fragment).map(|arn| short_layer(&arn.0).to_string()),
        state,
        pending,
    }
}

fn addon_state(record: &FunctionRecord, fragment: &str) -> AddonState {
    if find_addon_layer(record, fragment).is_none() {
        return AddonState::Absent;
    }
    match record.variables.get(catalog::DISABLED_FLAG).map(String::as_str) {
        Some("true") => AddonState::Disabled,
        _ => AddonState::Enabled,
    }
}

/// `<name>:<version>` from a layer version ARN.
fn short_layer(arn: &str) -> &str {
    arn.split_once(":layer:").map_or(arn, |(_, rest)| rest)
}

fn print_table(operation: &str, rows: Vec<FunctionState>) {
    let attached = rows
        .iter()
        .filter(|r| matches!(r.state, AddonState::Enabled | AddonState::Disabled))
        .count();
    let pending = rows
        .iter()
        .filter(|r| r.pending != "none" && !r.pending.starts_with("skip"))
        .count();
    println!(
        "layerctl v{} | {operation} | {} selected | {attached} attached | {pending} pending",
        env!("CARGO_PKG_VERSION"),
        rows.len(),
    );

    if rows.is_empty() {
        println!("No functions selected.");
        return;
    }

    let table_rows: Vec<ListTableRow> = rows
        .into_iter()
        .map(|row| ListTableRow {
            function: row.function,
            runtime: row.runtime.unwrap_or_else(|| "-".to_string()),
            layer: row.layer.unwrap_or_else(|| "-".to_string()),
            state: state_label(row.state),
            pending: row.pending,
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn state_label(state: AddonState) -> String {
    match state {
        AddonState::Absent => "ABSENT".bright_black().to_string(),
        AddonState::Enabled => "ENABLED".green().bold().to_string(),
        AddonState::Disabled => "DISABLED".yellow().bold().to_string(),
        AddonState::Unsupported => "UNSUPPORTED".red().to_string(),
    }
}
