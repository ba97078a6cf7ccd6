//! The variable catalog: every environment variable the add-on owns.
//!
//! | Name                       | Value                      | Protected |
//! |----------------------------|----------------------------|-----------|
//! | `NODE_OPTIONS`             | static preload flag        | no        |
//! | `ACCOUNT_ID`               | caller identity            | no        |
//! | `ASSERTS_METRIC_ENDPOINT`  | config                     | no        |
//! | `ASSERTS_TENANT_NAME`      | config                     | no        |
//! | `ASSERTS_PASSWORD`         | config (secret)            | no        |
//! | `ASSERTS_ENVIRONMENT`      | config                     | yes       |
//! | `ASSERTS_SITE`             | config                     | yes       |
//! | `OTEL_RESOURCE_ATTRIBUTES` | per-function template      | no        |
//! | `ASSERTS_LAYER_DISABLED`   | flag (enable/disable only) | yes       |
//! | `OTEL_TRACES_EXPORTER`     | flag (enable/disable only) | yes       |
//!
//! A protected variable survives a refresh that does not resupply it and is
//! removed only by detach.

use crate::config::AddonSettings;
use crate::error::ConfigError;
use crate::template::ResourceAttributesTemplate;
use crate::types::{FunctionRecord, Variables};

pub const NODE_OPTIONS: &str = "NODE_OPTIONS";
pub const ACCOUNT_ID: &str = "ACCOUNT_ID";
pub const METRIC_ENDPOINT: &str = "ASSERTS_METRIC_ENDPOINT";
pub const TENANT_NAME: &str = "ASSERTS_TENANT_NAME";
pub const PASSWORD: &str = "ASSERTS_PASSWORD";
pub const ENVIRONMENT: &str = "ASSERTS_ENVIRONMENT";
pub const SITE: &str = "ASSERTS_SITE";
pub const RESOURCE_ATTRIBUTES: &str = "OTEL_RESOURCE_ATTRIBUTES";
pub const DISABLED_FLAG: &str = "ASSERTS_LAYER_DISABLED";
pub const TRACES_EXPORTER: &str = "OTEL_TRACES_EXPORTER";

pub const NODE_OPTIONS_VALUE: &str = "-r asserts-aws-lambda-layer/awslambda-auto";
pub const TRACES_ENABLED: &str = "otlp";
pub const TRACES_DISABLED: &str = "none";

/// Where a managed variable's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    /// Same value on every function.
    Static(String),
    /// Managed, but no value configured for this run.
    Unset,
    /// Rendered per function from the resource-attribute template.
    Template,
    /// Written only by enable/disable.
    Flag,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSpec {
    pub name: &'static str,
    pub value: VariableValue,
    pub protected: bool,
    /// Masked in plans and logs.
    pub secret: bool,
}

impl VariableSpec {
    fn new(name: &'static str, value: VariableValue) -> Self {
        Self {
            name,
            value,
            protected: false,
            secret: false,
        }
    }

    fn optional(name: &'static str, value: Option<&String>) -> Self {
        Self::new(
            name,
            value.map_or(VariableValue::Unset, |v| VariableValue::Static(v.clone())),
        )
    }

    fn protected(mut self) -> Self {
        self.protected = true;
        self
    }

    fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

/// Immutable catalog for one run, built from config and caller identity.
#[derive(Debug)]
pub struct VariableCatalog {
    entries: Vec<VariableSpec>,
    template: ResourceAttributesTemplate,
}

impl VariableCatalog {
    pub fn new(settings: &AddonSettings, account_id: &str) -> Result<Self, ConfigError> {
        let entries = vec![
            VariableSpec::new(NODE_OPTIONS, VariableValue::Static(NODE_OPTIONS_VALUE.to_string())),
            VariableSpec::new(ACCOUNT_ID, VariableValue::Static(account_id.to_string())),
            VariableSpec::optional(METRIC_ENDPOINT, settings.metric_endpoint.as_ref()),
            VariableSpec::optional(TENANT_NAME, settings.tenant_name.as_ref()),
            VariableSpec::optional(PASSWORD, settings.password.as_ref()).secret(),
            VariableSpec::optional(ENVIRONMENT, settings.environment.as_ref()).protected(),
            VariableSpec::optional(SITE, settings.site.as_ref()).protected(),
            VariableSpec::new(RESOURCE_ATTRIBUTES, VariableValue::Template),
            VariableSpec::new(DISABLED_FLAG, VariableValue::Flag).protected(),
            VariableSpec::new(TRACES_EXPORTER, VariableValue::Flag).protected(),
        ];
        Ok(Self {
            entries,
            template: ResourceAttributesTemplate::new()?,
        })
    }

    pub fn protected_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().filter(|e| e.protected).map(|e| e.name)
    }

    pub fn is_managed(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_protected(&self, name: &str) -> bool {
        self.get(name).is_some_and(|e| e.protected)
    }

    pub fn is_secret(&self, name: &str) -> bool {
        self.get(name).is_some_and(|e| e.secret)
    }

    fn get(&self, name: &str) -> Option<&VariableSpec> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn static_value(&self, name: &str) -> Option<&str> {
        match self.get(name).map(|e| &e.value) {
            Some(VariableValue::Static(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// The variables the add-on wants on `function`: every configured static
    /// value plus the rendered resource attributes.
    ///
    /// Environment and site for the template come from config, falling back
    /// to the function's current value so the attributes agree with what the
    /// function keeps after the merge.
    pub fn desired_for(&self, function: &FunctionRecord) -> Result<Variables, ConfigError> {
        let mut desired = Variables::new();
        for entry in &self.entries {
            match &entry.value {
                VariableValue::Static(v) => {
                    desired.insert(entry.name.to_string(), v.clone());
                }
                VariableValue::Template => {
                    let environment = self
                        .static_value(ENVIRONMENT)
                        .or_else(|| function.variables.get(ENVIRONMENT).map(String::as_str));
                    let site = self
                        .static_value(SITE)
                        .or_else(|| function.variables.get(SITE).map(String::as_str));
                    let rendered = self.template.render(&function.name, environment, site)?;
                    desired.insert(entry.name.to_string(), rendered);
                }
                VariableValue::Unset | VariableValue::Flag => {}
            }
        }
        Ok(desired)
    }
}

/// Flag values written by enable (`disabled == false`) and disable.
pub fn flag_values(disabled: bool) -> [(&'static str, &'static str); 2] {
    if disabled {
        [(DISABLED_FLAG, "true"), (TRACES_EXPORTER, TRACES_DISABLED)]
    } else {
        [(DISABLED_FLAG, "false"), (TRACES_EXPORTER, TRACES_ENABLED)]
    }
}
