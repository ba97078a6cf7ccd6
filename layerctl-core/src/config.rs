//! Declarative run configuration.
//!
//! # File lookup
//!
//! ```text
//! ./config.yml                 (preferred when present)
//! ~/.layerctl/config.yml       (fallback)
//! ```
//!
//! # API pattern
//!
//! - `load_at(path)`: explicit path; used by tests and `--config`
//! - `load()`: resolves the default location, delegates to `load_at`
//!
//! The raw YAML document is deserialized into [`RawConfig`] and then
//! validated into an immutable [`Config`]. Validation happens once, before any
//! provider call, so an invalid file never results in a partial run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{FunctionName, FunctionPattern, LayerArn, OperationKind, Selection};

/// Default file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Substring that identifies the add-on layer in a layer ARN.
pub const DEFAULT_LAYER_NAME_FRAGMENT: &str = "asserts-aws-lambda-layer";

/// Runtimes the add-on layer supports.
pub const DEFAULT_RUNTIMES: &[&str] = &[
    "nodejs12.x",
    "nodejs14.x",
    "nodejs16.x",
    "nodejs18.x",
    "nodejs20.x",
];

// ---------------------------------------------------------------------------
// 1. Raw document
// ---------------------------------------------------------------------------

/// The config file exactly as written. Every field is optional here;
/// [`Config::from_raw`] decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    pub operation: Option<String>,
    pub function_names: Option<Vec<String>>,
    pub function_name_pattern: Option<String>,
    pub layer_arn: Option<String>,
    #[serde(rename = "ASSERTS_METRIC_ENDPOINT")]
    pub metric_endpoint: Option<String>,
    #[serde(rename = "ASSERTS_TENANT_NAME")]
    pub tenant_name: Option<String>,
    #[serde(rename = "ASSERTS_PASSWORD")]
    pub password: Option<String>,
    #[serde(rename = "ASSERTS_ENVIRONMENT")]
    pub environment: Option<String>,
    #[serde(rename = "ASSERTS_SITE")]
    pub site: Option<String>,
    pub runtimes: Option<Vec<String>>,
    pub layer_name_fragment: Option<String>,
    pub account_id: Option<String>,
}

// ---------------------------------------------------------------------------
// 2. Validated config
// ---------------------------------------------------------------------------

/// Static add-on values supplied by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddonSettings {
    pub metric_endpoint: Option<String>,
    pub tenant_name: Option<String>,
    pub password: Option<String>,
    pub environment: Option<String>,
    pub site: Option<String>,
}

/// Validated, immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub operation: OperationKind,
    pub selection: Selection,
    /// Present whenever `operation.requires_layer_arn()`.
    pub layer_arn: Option<LayerArn>,
    pub layer_name_fragment: String,
    pub runtimes: Vec<String>,
    pub settings: AddonSettings,
    /// Overrides the caller-identity lookup when set.
    pub account_id: Option<String>,
}

impl Config {
    /// Validate a raw document.
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let operation: OperationKind = raw
            .operation
            .as_deref()
            .ok_or(ConfigError::MissingOperation)?
            .parse()
            .map_err(ConfigError::InvalidOperation)?;

        // Explicit names win over the pattern when both are given.
        let selection = match (raw.function_names, raw.function_name_pattern) {
            (Some(names), _) => {
                if names.is_empty() {
                    return Err(ConfigError::EmptyFunctionNames);
                }
                Selection::Names(names.into_iter().map(FunctionName::from).collect::<BTreeSet<_>>())
            }
            (None, Some(pattern)) => {
                let compiled = FunctionPattern::new(&pattern)
                    .map_err(|source| ConfigError::InvalidPattern { pattern, source })?;
                Selection::Pattern(compiled)
            }
            (None, None) => return Err(ConfigError::MissingSelection),
        };

        let layer_name_fragment = raw
            .layer_name_fragment
            .unwrap_or_else(|| DEFAULT_LAYER_NAME_FRAGMENT.to_string());

        let layer_arn = raw.layer_arn.map(LayerArn::from);
        if operation.requires_layer_arn() {
            match &layer_arn {
                None => {
                    return Err(ConfigError::MissingLayerArn {
                        operation: operation.config_name(),
                    })
                }
                Some(arn) if !arn.contains(&layer_name_fragment) => {
                    return Err(ConfigError::ForeignLayerArn {
                        arn: arn.0.clone(),
                        fragment: layer_name_fragment,
                    })
                }
                Some(_) => {}
            }
        }

        if operation == OperationKind::Attach && raw.metric_endpoint.is_none() {
            return Err(ConfigError::MissingVariable {
                name: crate::catalog::METRIC_ENDPOINT,
                operation: operation.config_name(),
            });
        }

        let runtimes = raw
            .runtimes
            .unwrap_or_else(|| DEFAULT_RUNTIMES.iter().map(|r| (*r).to_string()).collect());

        Ok(Self {
            operation,
            selection,
            layer_arn,
            layer_name_fragment,
            runtimes,
            settings: AddonSettings {
                metric_endpoint: raw.metric_endpoint,
                tenant_name: raw.tenant_name,
                password: raw.password,
                environment: raw.environment,
                site: raw.site,
            },
            account_id: raw.account_id,
        })
    }
}

// ---------------------------------------------------------------------------
// 3. Load
// ---------------------------------------------------------------------------

/// Parse and validate a YAML document. `path` is only used for messages.
pub fn from_yaml_str(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    let raw: Option<RawConfig> = serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    let raw = raw.ok_or_else(|| ConfigError::Empty {
        path: path.to_path_buf(),
    })?;
    Config::from_raw(raw)
}

/// Load and validate the config at `path`.
///
/// Returns `ConfigError::ConfigNotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    from_yaml_str(&contents, path)
}

/// `load_at` convenience wrapper over [`default_path`].
pub fn load() -> Result<Config, ConfigError> {
    load_at(&default_path()?)
}

/// `./config.yml` if it exists, else `~/.layerctl/config.yml`.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(local);
    }
    Ok(home_config_path_at(&home()?))
}

/// `<home>/.layerctl/config.yml`: pure, no I/O.
pub fn home_config_path_at(home: &Path) -> PathBuf {
    home.join(".layerctl").join(CONFIG_FILE_NAME)
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str = "arn:aws:lambda:us-west-2:123456789012:layer:asserts-aws-lambda-layer:3";

    fn parse(yaml: &str) -> Result<Config, ConfigError> {
        from_yaml_str(yaml, Path::new("config.yml"))
    }

    #[test]
    fn minimal_attach_config() {
        let cfg = parse(&format!(
            "operation: add-layer\nfunction_names: [fn-a]\nlayer_arn: {ARN}\nASSERTS_METRIC_ENDPOINT: https://m\n"
        ))
        .expect("valid");
        assert_eq!(cfg.operation, OperationKind::Attach);
        assert_eq!(cfg.layer_arn, Some(LayerArn::from(ARN)));
        assert_eq!(cfg.layer_name_fragment, DEFAULT_LAYER_NAME_FRAGMENT);
        assert!(cfg.runtimes.iter().any(|r| r == "nodejs18.x"));
        assert_eq!(cfg.settings.metric_endpoint.as_deref(), Some("https://m"));
    }

    #[test]
    fn names_take_precedence_over_pattern() {
        let cfg = parse("operation: enable\nfunction_names: [fn-a]\nfunction_name_pattern: 'svc-.*'\n")
            .expect("valid");
        assert!(matches!(cfg.selection, Selection::Names(_)));
    }

    #[test]
    fn missing_operation() {
        let err = parse("function_names: [fn-a]\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingOperation));
    }

    #[test]
    fn empty_document_is_rejected() {
        let err = parse("# nothing here\n").unwrap_err();
        assert!(matches!(err, ConfigError::Empty { .. }), "got: {err}");
    }

    #[test]
    fn home_config_path_is_correct() {
        let path = home_config_path_at(Path::new("/home/u"));
        assert!(path.ends_with(".layerctl/config.yml"));
    }
}
