pub mod apply;
pub mod list;
pub mod plan;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use layerctl_aws::LambdaFleet;
use layerctl_core::{config, Config};
use layerctl_reconcile::{
    CallerIdentity, FunctionInventory, FunctionPage, ProviderError, SnapshotInventory,
};

/// Load the explicit config path, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => config::load_at(path)
            .with_context(|| format!("invalid config at {}", path.display())),
        None => config::load().context("invalid config"),
    }
}

/// Where functions are read from, shared by the read-only commands.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Read a saved `aws lambda list-functions` response instead of calling AWS.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// AWS region (default: from the environment or profile).
    #[arg(long)]
    pub region: Option<String>,

    /// Account ID to template into the variables, skipping the STS lookup.
    #[arg(long)]
    pub account_id: Option<String>,
}

impl SourceArgs {
    pub fn open(&self) -> Result<Fleet> {
        match &self.snapshot {
            Some(path) => SnapshotInventory::load_at(path)
                .map(Fleet::Snapshot)
                .with_context(|| format!("failed to read snapshot {}", path.display())),
            None => connect(self.region.clone()).map(Fleet::Aws),
        }
    }
}

/// Apply `--account-id` over the config value.
pub fn override_account(mut config: Config, account_id: Option<String>) -> Config {
    if account_id.is_some() {
        config.account_id = account_id;
    }
    config
}

pub fn connect(region: Option<String>) -> Result<LambdaFleet> {
    LambdaFleet::new(region).context("failed to initialise AWS clients")
}

/// A live account or an offline snapshot.
pub enum Fleet {
    Aws(LambdaFleet),
    Snapshot(SnapshotInventory),
}

impl FunctionInventory for Fleet {
    fn list_functions(&self, marker: Option<&str>) -> Result<FunctionPage, ProviderError> {
        match self {
            Fleet::Aws(f) => f.list_functions(marker),
            Fleet::Snapshot(s) => s.list_functions(marker),
        }
    }
}

impl CallerIdentity for Fleet {
    fn account_id(&self) -> Result<String, ProviderError> {
        match self {
            Fleet::Aws(f) => f.account_id(),
            Fleet::Snapshot(s) => s.account_id(),
        }
    }
}
