//! Seams to the function provider.
//!
//! The reconciler only ever talks to these three traits. Calls are
//! synchronous: each one is fully complete before the next function or page is
//! considered.

use layerctl_core::{FunctionName, FunctionRecord, LayerArn, Variables};

use crate::error::ProviderError;

/// One page of the function inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionPage {
    pub functions: Vec<FunctionRecord>,
    /// Opaque continuation token; `None` on the last page.
    pub next_marker: Option<String>,
}

/// Paginated function listing.
pub trait FunctionInventory {
    fn list_functions(&self, marker: Option<&str>) -> Result<FunctionPage, ProviderError>;
}

/// A configuration update for one function.
///
/// A `None` field is omitted from the provider call and stays unchanged
/// provider-side; sending variables never clears layers and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub function_name: FunctionName,
    pub layers: Option<Vec<LayerArn>>,
    pub variables: Option<Variables>,
}

/// Single-function configuration update.
pub trait ConfigurationUpdater {
    fn update_configuration(&self, request: &UpdateRequest) -> Result<(), ProviderError>;
}

/// Resolves the account the caller's credentials belong to.
pub trait CallerIdentity {
    fn account_id(&self) -> Result<String, ProviderError>;
}
