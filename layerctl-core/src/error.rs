//! Error types for layerctl-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading and validating configuration.
///
/// Every variant is fatal and is raised before any provider call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure reading the config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load, with the file path.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The document parsed to nothing.
    #[error("config at {path} is empty")]
    Empty { path: PathBuf },

    #[error("config is invalid: 'operation' is not specified")]
    MissingOperation,

    #[error("config is invalid: {0}")]
    InvalidOperation(String),

    #[error("config is invalid: either 'function_name_pattern' or 'function_names' should be specified")]
    MissingSelection,

    #[error("config is invalid: 'function_names' is empty")]
    EmptyFunctionNames,

    #[error("config is invalid: bad 'function_name_pattern' '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("config is invalid: 'layer_arn' needs to be specified for '{operation}'")]
    MissingLayerArn { operation: &'static str },

    #[error("config is invalid: 'layer_arn' {arn} does not contain the layer name '{fragment}'")]
    ForeignLayerArn { arn: String, fragment: String },

    #[error("config is invalid: '{name}' needs to be specified for '{operation}'")]
    MissingVariable {
        name: &'static str,
        operation: &'static str,
    },

    /// The resource-attribute template failed to compile or render.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// `dirs::home_dir()` returned `None` and no local config exists.
    #[error("cannot determine home directory; set $HOME or pass --config")]
    HomeNotFound,
}
