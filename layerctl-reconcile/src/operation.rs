//! Operation state machine.
//!
//! | Operation         | No add-on layer             | Add-on layer attached          |
//! |-------------------|-----------------------------|--------------------------------|
//! | attach            | append layer, merge vars    | merge vars                     |
//! | detach            | no-op                       | remove layer(s), strip vars    |
//! | enable            | no-op                       | flags → enabled                |
//! | disable           | no-op                       | flags → disabled               |
//! | refresh-variables | skip (reported)             | merge vars                     |
//! | bump-version      | drop old layer(s), append new; vars untouched                |
//!
//! Every computed field is compared with the function's current value and
//! only kept when it differs, so a second run of the same operation plans no
//! update.

use serde::Serialize;

use layerctl_core::{
    catalog, ConfigError, FunctionRecord, LayerArn, OperationKind, VariableCatalog, Variables,
};

use crate::layers::{find_addon_layer, without_addon_layers};
use crate::merge::{merge, strip};
use crate::provider::UpdateRequest;

/// The fields to submit for one function. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredState {
    pub layers: Option<Vec<LayerArn>>,
    pub variables: Option<Variables>,
}

impl DesiredState {
    /// Keep only the fields that differ from `record`.
    fn gated(record: &FunctionRecord, layers: Option<Vec<LayerArn>>, variables: Option<Variables>) -> Self {
        Self {
            layers: layers.filter(|l| *l != record.layers),
            variables: variables.filter(|v| *v != record.variables),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.layers.is_none() && self.variables.is_none()
    }

    pub fn into_request(self, record: &FunctionRecord) -> UpdateRequest {
        UpdateRequest {
            function_name: record.name.clone(),
            layers: self.layers,
            variables: self.variables,
        }
    }
}

/// Why a selected function was not reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum SkipReason {
    /// The operation needs the add-on and the function does not have it.
    AddonNotPresent,
    /// The function's runtime is not on the allow-list.
    UnsupportedRuntime { runtime: Option<String> },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::AddonNotPresent => write!(f, "add-on layer not present"),
            SkipReason::UnsupportedRuntime { runtime: Some(rt) } => {
                write!(f, "runtime '{rt}' not supported")
            }
            SkipReason::UnsupportedRuntime { runtime: None } => write!(f, "no runtime"),
        }
    }
}

/// Result of evaluating one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Submit these fields. Never constructed with both fields unset.
    Update(DesiredState),
    /// Already in the desired state, or nothing to do for this operation.
    Unchanged,
    /// Not reconciled; reported and the run continues.
    Skip(SkipReason),
}

/// Everything the state machine reads besides the function itself.
#[derive(Debug, Clone, Copy)]
pub struct OperationContext<'a> {
    pub operation: OperationKind,
    /// Required for attach and bump-version.
    pub layer_arn: Option<&'a LayerArn>,
    pub layer_name_fragment: &'a str,
    pub catalog: &'a VariableCatalog,
}

impl OperationContext<'_> {
    fn layer_arn(&self) -> Result<&LayerArn, ConfigError> {
        self.layer_arn.ok_or(ConfigError::MissingLayerArn {
            operation: self.operation.config_name(),
        })
    }
}

/// Compute what `ctx.operation` should do to `record`.
pub fn plan(ctx: &OperationContext<'_>, record: &FunctionRecord) -> Result<Plan, ConfigError> {
    let has_addon = find_addon_layer(record, ctx.layer_name_fragment).is_some();

    let desired = match (ctx.operation, has_addon) {
        (OperationKind::Attach, false) => {
            let mut layers = record.layers.clone();
            layers.push(ctx.layer_arn()?.clone());
            let variables = merge(&record.variables, &ctx.catalog.desired_for(record)?, ctx.catalog);
            DesiredState::gated(record, Some(layers), Some(variables))
        }
        (OperationKind::Attach, true) | (OperationKind::RefreshVariables, true) => {
            let variables = merge(&record.variables, &ctx.catalog.desired_for(record)?, ctx.catalog);
            DesiredState::gated(record, None, Some(variables))
        }
        (OperationKind::RefreshVariables, false) => {
            return Ok(Plan::Skip(SkipReason::AddonNotPresent));
        }
        (OperationKind::Detach, true) => {
            let layers = without_addon_layers(&record.layers, ctx.layer_name_fragment);
            let variables = strip(&record.variables, ctx.catalog);
            DesiredState::gated(record, Some(layers), Some(variables))
        }
        (OperationKind::Enable, true) | (OperationKind::Disable, true) => {
            let mut variables = record.variables.clone();
            let disabled = ctx.operation == OperationKind::Disable;
            for (name, value) in catalog::flag_values(disabled) {
                variables.insert(name.to_string(), value.to_string());
            }
            DesiredState::gated(record, None, Some(variables))
        }
        (OperationKind::Detach, false)
        | (OperationKind::Enable, false)
        | (OperationKind::Disable, false) => DesiredState::default(),
        (OperationKind::BumpVersion, _) => {
            let mut layers = without_addon_layers(&record.layers, ctx.layer_name_fragment);
            layers.push(ctx.layer_arn()?.clone());
            DesiredState::gated(record, Some(layers), None)
        }
    };

    if desired.is_unchanged() {
        Ok(Plan::Unchanged)
    } else {
        Ok(Plan::Update(desired))
    }
}
