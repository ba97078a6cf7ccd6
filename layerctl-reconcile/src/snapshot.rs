//! Offline inventory read from saved `ListFunctions` responses.
//!
//! Accepts the JSON printed by `aws lambda list-functions`, either one
//! response object or an array of them (one per page). Lets `plan` and `list`
//! run without credentials.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use layerctl_core::{FunctionName, FunctionRecord, LayerArn};

use crate::error::{io_err, ProviderError, ReconcileError};
use crate::provider::{CallerIdentity, FunctionInventory, FunctionPage};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotDocument {
    Page(ListFunctionsResponse),
    Pages(Vec<ListFunctionsResponse>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListFunctionsResponse {
    #[serde(default)]
    functions: Vec<FunctionConfiguration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FunctionConfiguration {
    function_name: String,
    function_arn: String,
    runtime: Option<String>,
    #[serde(default)]
    layers: Option<Vec<Layer>>,
    environment: Option<EnvironmentResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Layer {
    arn: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EnvironmentResponse {
    #[serde(default)]
    variables: Option<BTreeMap<String, String>>,
}

impl From<FunctionConfiguration> for FunctionRecord {
    fn from(f: FunctionConfiguration) -> Self {
        FunctionRecord {
            name: FunctionName::from(f.function_name),
            arn: f.function_arn,
            runtime: f.runtime,
            layers: f
                .layers
                .unwrap_or_default()
                .into_iter()
                .map(|l| LayerArn::from(l.arn))
                .collect(),
            variables: f.environment.and_then(|e| e.variables).unwrap_or_default(),
        }
    }
}

/// In-memory pages loaded from a snapshot file.
#[derive(Debug, Clone, Default)]
pub struct SnapshotInventory {
    pages: Vec<Vec<FunctionRecord>>,
}

impl SnapshotInventory {
    pub fn from_json_str(contents: &str, path: &Path) -> Result<Self, ReconcileError> {
        let doc: SnapshotDocument =
            serde_json::from_str(contents).map_err(|source| ReconcileError::Snapshot {
                path: path.to_path_buf(),
                source,
            })?;
        let responses = match doc {
            SnapshotDocument::Page(page) => vec![page],
            SnapshotDocument::Pages(pages) => pages,
        };
        Ok(Self {
            pages: responses
                .into_iter()
                .map(|r| r.functions.into_iter().map(FunctionRecord::from).collect())
                .collect(),
        })
    }

    pub fn load_at(path: &Path) -> Result<Self, ReconcileError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Self::from_json_str(&contents, path)
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.pages.iter().flatten()
    }
}

impl FunctionInventory for SnapshotInventory {
    fn list_functions(&self, marker: Option<&str>) -> Result<FunctionPage, ProviderError> {
        let index = match marker {
            None => 0,
            Some(m) => m
                .parse::<usize>()
                .map_err(|e| ProviderError::new("ListFunctions", e))?,
        };
        let functions = self.pages.get(index).cloned().unwrap_or_default();
        let next_marker = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(FunctionPage {
            functions,
            next_marker,
        })
    }
}

impl CallerIdentity for SnapshotInventory {
    /// The account field of the first function ARN
    /// (`arn:aws:lambda:<region>:<account>:function:<name>`).
    fn account_id(&self) -> Result<String, ProviderError> {
        self.functions()
            .next()
            .and_then(|f| f.arn.split(':').nth(4))
            .filter(|account| !account.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                ProviderError::new("GetCallerIdentity", "snapshot has no function ARN to read")
            })
    }
}
