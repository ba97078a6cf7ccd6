//! Shared run entrypoints used by the CLI.

use layerctl_core::Config;

use crate::error::ReconcileError;
use crate::provider::{CallerIdentity, ConfigurationUpdater, FunctionInventory};
use crate::reconciler::{PlannedFunction, Reconciler, RunMode, RunReport};

/// The configured `account_id` if set, else one caller-identity lookup.
pub fn resolve_account_id<C: CallerIdentity + ?Sized>(
    config: &Config,
    identity: &C,
) -> Result<String, ReconcileError> {
    if let Some(account_id) = &config.account_id {
        return Ok(account_id.clone());
    }
    identity.account_id().map_err(ReconcileError::Identity)
}

/// Resolve the account, build the reconciler, reconcile the fleet.
pub fn run<P>(config: Config, provider: &P, mode: RunMode) -> Result<RunReport, ReconcileError>
where
    P: FunctionInventory + ConfigurationUpdater + CallerIdentity + ?Sized,
{
    let account_id = resolve_account_id(&config, provider)?;
    let reconciler = Reconciler::new(config, &account_id)?;
    reconciler.run(provider, provider, mode)
}

/// Resolve the account and plan every selected function without writing.
pub fn plan<P>(config: Config, provider: &P) -> Result<Vec<PlannedFunction>, ReconcileError>
where
    P: FunctionInventory + CallerIdentity + ?Sized,
{
    let account_id = resolve_account_id(&config, provider)?;
    let reconciler = Reconciler::new(config, &account_id)?;
    reconciler.plan_all(provider)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use layerctl_core::config::from_yaml_str;

    use super::*;
    use crate::error::ProviderError;

    struct FixedIdentity;

    impl CallerIdentity for FixedIdentity {
        fn account_id(&self) -> Result<String, ProviderError> {
            Ok("from-sts".to_string())
        }
    }

    struct BrokenIdentity;

    impl CallerIdentity for BrokenIdentity {
        fn account_id(&self) -> Result<String, ProviderError> {
            Err(ProviderError::new("GetCallerIdentity", "expired token"))
        }
    }

    fn config(extra: &str) -> Config {
        from_yaml_str(
            &format!("operation: enable-layer\nfunction_names: [fn-a]\n{extra}"),
            Path::new("config.yml"),
        )
        .expect("config")
    }

    #[test]
    fn configured_account_skips_lookup() {
        let id = resolve_account_id(&config("account_id: '42'\n"), &BrokenIdentity).expect("id");
        assert_eq!(id, "42");
    }

    #[test]
    fn lookup_used_when_not_configured() {
        assert_eq!(resolve_account_id(&config(""), &FixedIdentity).expect("id"), "from-sts");
    }

    #[test]
    fn lookup_failure_is_identity_error() {
        let err = resolve_account_id(&config(""), &BrokenIdentity).unwrap_err();
        assert!(matches!(err, ReconcileError::Identity(_)));
        assert!(err.to_string().contains("expired token"));
    }
}
