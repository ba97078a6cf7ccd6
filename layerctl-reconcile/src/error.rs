//! Error types for layerctl-reconcile.

use std::path::PathBuf;

use thiserror::Error;

use layerctl_core::{ConfigError, FunctionName};

/// A failed call to an external collaborator (listing, update, identity).
///
/// Never retried by the reconciler.
#[derive(Debug, Error)]
#[error("{call} failed: {source}")]
pub struct ProviderError {
    pub call: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl ProviderError {
    pub fn new(
        call: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            call,
            source: source.into(),
        }
    }
}

/// All errors that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Invalid configuration or template failure.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Caller-identity lookup failed.
    #[error("failed to resolve caller account: {0}")]
    Identity(#[source] ProviderError),

    /// A page of the function inventory could not be listed.
    #[error("failed to list functions: {0}")]
    Listing(#[source] ProviderError),

    /// Updating one function's configuration failed. Functions before it are
    /// already reconciled; re-running resumes safely.
    #[error("failed to update function '{function}': {source}")]
    Update {
        function: FunctionName,
        #[source]
        source: ProviderError,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed inventory snapshot.
    #[error("failed to parse snapshot at {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience constructor for [`ReconcileError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ReconcileError {
    ReconcileError::Io {
        path: path.into(),
        source,
    }
}
