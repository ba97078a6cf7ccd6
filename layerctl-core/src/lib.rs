//! layerctl core library: domain types, variable catalog, config, errors.
//!
//! - [`types`]: newtypes, [`FunctionRecord`], [`OperationKind`], [`Selection`]
//! - [`catalog`]: the managed/protected variable catalog
//! - [`template`]: per-function resource-attribute rendering
//! - [`config`]: YAML load / validate
//! - [`error`]: [`ConfigError`]

pub mod catalog;
pub mod config;
pub mod error;
pub mod template;
pub mod types;

pub use catalog::VariableCatalog;
pub use config::{AddonSettings, Config};
pub use error::ConfigError;
pub use types::{
    FunctionName, FunctionPattern, FunctionRecord, LayerArn, OperationKind, Selection, Variables,
};
