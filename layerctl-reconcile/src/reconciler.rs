//! The reconciliation loop.
//!
//! ## Per function
//!
//! 1. Runtime allow-list (unsupported → skipped if selected, ignored otherwise).
//! 2. Selection predicate (not selected → ignored).
//! 3. Operation state machine → [`Plan`].
//! 4. `Plan::Update` → one configuration update with only the changed fields.
//!
//! Pages are pulled lazily, so the next listing call happens only after every
//! update for the current page has returned. The first provider failure
//! aborts the run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use layerctl_core::{Config, FunctionName, FunctionRecord, VariableCatalog};

use crate::diff::{diff_function, FunctionDiff};
use crate::error::ReconcileError;
use crate::operation::{plan, OperationContext, Plan, SkipReason};
use crate::pages::pages;
use crate::predicate::{is_supported_runtime, matches};
use crate::provider::{ConfigurationUpdater, FunctionInventory};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Whether update calls are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Apply,
    DryRun,
}

/// Outcome for an individual selected function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum FunctionOutcome {
    /// Update call succeeded.
    Updated { layers: bool, variables: bool },
    /// Dry run: the update *would* have been issued.
    WouldUpdate { layers: bool, variables: bool },
    /// Nothing to change.
    Unchanged,
    /// Not reconciled; the run continued.
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionReport {
    pub function: FunctionName,
    #[serde(flatten)]
    pub outcome: FunctionOutcome,
}

/// Summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub operation: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Every function listed, selected or not.
    pub scanned: usize,
    /// Selected functions only, in inventory order.
    pub functions: Vec<FunctionReport>,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&FunctionOutcome) -> bool) -> usize {
        self.functions.iter().filter(|f| pred(&f.outcome)).count()
    }

    pub fn changed(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                FunctionOutcome::Updated { .. } | FunctionOutcome::WouldUpdate { .. }
            )
        })
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, FunctionOutcome::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FunctionOutcome::Skipped { .. }))
    }
}

/// A selected function with its plan and rendered diff.
#[derive(Debug, Clone)]
pub struct PlannedFunction {
    pub record: FunctionRecord,
    pub plan: Plan,
    pub diff: Option<FunctionDiff>,
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Owns the immutable inputs of a run.
#[derive(Debug)]
pub struct Reconciler {
    config: Config,
    catalog: VariableCatalog,
}

impl Reconciler {
    pub fn new(config: Config, account_id: &str) -> Result<Self, ReconcileError> {
        let catalog = VariableCatalog::new(&config.settings, account_id)?;
        Ok(Self { config, catalog })
    }

    fn context(&self) -> OperationContext<'_> {
        OperationContext {
            operation: self.config.operation,
            layer_arn: self.config.layer_arn.as_ref(),
            layer_name_fragment: &self.config.layer_name_fragment,
            catalog: &self.catalog,
        }
    }

    /// Plan for one function, or `None` if it is not selected.
    pub fn evaluate(&self, record: &FunctionRecord) -> Result<Option<Plan>, ReconcileError> {
        let selected = matches(record, &self.config.selection);
        if !is_supported_runtime(record, &self.config.runtimes) {
            if !selected {
                return Ok(None);
            }
            return Ok(Some(Plan::Skip(SkipReason::UnsupportedRuntime {
                runtime: record.runtime.clone(),
            })));
        }
        if !selected {
            return Ok(None);
        }
        Ok(Some(plan(&self.context(), record)?))
    }

    /// Walk the whole inventory, handing each selected function and its plan
    /// to `f`. Returns the number of functions listed.
    pub fn visit<I, F>(&self, inventory: &I, mut f: F) -> Result<usize, ReconcileError>
    where
        I: FunctionInventory + ?Sized,
        F: FnMut(&FunctionRecord, Plan) -> Result<(), ReconcileError>,
    {
        let mut scanned = 0;
        for page in pages(inventory) {
            let page = page.map_err(ReconcileError::Listing)?;
            for record in &page {
                scanned += 1;
                match self.evaluate(record)? {
                    Some(plan) => f(record, plan)?,
                    None => tracing::trace!("not selected: {}", record.name),
                }
            }
        }
        Ok(scanned)
    }

    /// Reconcile every selected function.
    pub fn run<I, U>(
        &self,
        inventory: &I,
        updater: &U,
        mode: RunMode,
    ) -> Result<RunReport, ReconcileError>
    where
        I: FunctionInventory + ?Sized,
        U: ConfigurationUpdater + ?Sized,
    {
        let started_at = Utc::now();
        let operation = self.config.operation;
        tracing::info!(%operation, selection = %self.config.selection, "starting run");

        let mut functions = Vec::new();
        let scanned = self.visit(inventory, |record, plan| {
            let outcome = apply_plan(record, plan, updater, mode)?;
            functions.push(FunctionReport {
                function: record.name.clone(),
                outcome,
            });
            Ok(())
        })?;

        let report = RunReport {
            operation: operation.to_string(),
            dry_run: mode == RunMode::DryRun,
            started_at,
            finished_at: Utc::now(),
            scanned,
            functions,
        };
        tracing::info!(
            scanned,
            changed = report.changed(),
            unchanged = report.unchanged(),
            skipped = report.skipped(),
            "run finished"
        );
        Ok(report)
    }

    /// Plan every selected function and render its diff. Issues no updates.
    pub fn plan_all<I>(&self, inventory: &I) -> Result<Vec<PlannedFunction>, ReconcileError>
    where
        I: FunctionInventory + ?Sized,
    {
        let mut planned = Vec::new();
        self.visit(inventory, |record, plan| {
            let diff = match &plan {
                Plan::Update(desired) => diff_function(record, desired, &self.catalog),
                Plan::Unchanged | Plan::Skip(_) => None,
            };
            planned.push(PlannedFunction {
                record: record.clone(),
                plan,
                diff,
            });
            Ok(())
        })?;
        Ok(planned)
    }
}

fn apply_plan<U: ConfigurationUpdater + ?Sized>(
    record: &FunctionRecord,
    plan: Plan,
    updater: &U,
    mode: RunMode,
) -> Result<FunctionOutcome, ReconcileError> {
    match plan {
        Plan::Update(desired) => {
            let layers = desired.layers.is_some();
            let variables = desired.variables.is_some();
            if mode == RunMode::DryRun {
                tracing::info!(function = %record.name, layers, variables, "[dry-run] would update");
                return Ok(FunctionOutcome::WouldUpdate { layers, variables });
            }
            let request = desired.into_request(record);
            updater
                .update_configuration(&request)
                .map_err(|source| ReconcileError::Update {
                    function: record.name.clone(),
                    source,
                })?;
            tracing::info!(function = %record.name, layers, variables, "updated");
            Ok(FunctionOutcome::Updated { layers, variables })
        }
        Plan::Unchanged => {
            tracing::debug!("unchanged: {}", record.name);
            Ok(FunctionOutcome::Unchanged)
        }
        Plan::Skip(reason) => {
            tracing::info!(function = %record.arn, %reason, "skipped");
            Ok(FunctionOutcome::Skipped { reason })
        }
    }
}
