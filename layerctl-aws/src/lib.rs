//! # layerctl-aws
//!
//! AWS Lambda and STS implementation of the provider traits.
//!
//! The SDK is async; [`LambdaFleet`] owns a current-thread runtime and blocks
//! on each call so the reconciler stays synchronous and strictly sequential.

use std::collections::BTreeMap;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::types::{Environment, FunctionConfiguration};
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_sts::Client as StsClient;
use tokio::runtime::Runtime;
use tracing::{debug, info_span, warn, Instrument};

use layerctl_core::{FunctionName, FunctionRecord, LayerArn};
use layerctl_reconcile::{
    CallerIdentity, ConfigurationUpdater, FunctionInventory, FunctionPage, ProviderError,
    UpdateRequest,
};

/// The account's Lambda functions, reached with the default credential chain.
pub struct LambdaFleet {
    runtime: Runtime,
    lambda: LambdaClient,
    sts: StsClient,
    region: Option<String>,
}

impl std::fmt::Debug for LambdaFleet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LambdaFleet")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl LambdaFleet {
    /// Load the SDK config. `region` overrides the environment/profile region.
    pub fn new(region: Option<String>) -> Result<Self, ProviderError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProviderError::new("runtime", e))?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = runtime.block_on(loader.load());
        debug!(region = ?sdk_config.region(), "loaded AWS config");

        Ok(Self {
            lambda: LambdaClient::new(&sdk_config),
            sts: StsClient::new(&sdk_config),
            runtime,
            region,
        })
    }
}

impl FunctionInventory for LambdaFleet {
    fn list_functions(&self, marker: Option<&str>) -> Result<FunctionPage, ProviderError> {
        let span = info_span!("lambda.list_functions", marker = marker.unwrap_or(""));
        let output = self
            .runtime
            .block_on(
                self.lambda
                    .list_functions()
                    .set_marker(marker.map(str::to_owned))
                    .send()
                    .instrument(span),
            )
            .map_err(|e| ProviderError::new("ListFunctions", DisplayErrorContext(&e).to_string()))?;

        let functions = output.functions().iter().filter_map(record_from).collect();
        Ok(FunctionPage {
            functions,
            next_marker: output.next_marker().map(str::to_owned),
        })
    }
}

impl ConfigurationUpdater for LambdaFleet {
    fn update_configuration(&self, request: &UpdateRequest) -> Result<(), ProviderError> {
        let span = info_span!("lambda.update_function_configuration", function = %request.function_name);

        let mut call = self
            .lambda
            .update_function_configuration()
            .function_name(request.function_name.0.as_str());
        if let Some(layers) = &request.layers {
            call = call.set_layers(Some(layers.iter().map(|l| l.0.clone()).collect()));
        }
        if let Some(variables) = &request.variables {
            call = call.environment(
                Environment::builder()
                    .set_variables(Some(variables.clone().into_iter().collect()))
                    .build(),
            );
        }

        self.runtime
            .block_on(call.send().instrument(span))
            .map_err(|e| {
                ProviderError::new("UpdateFunctionConfiguration", DisplayErrorContext(&e).to_string())
            })?;
        Ok(())
    }
}

impl CallerIdentity for LambdaFleet {
    fn account_id(&self) -> Result<String, ProviderError> {
        let span = info_span!("sts.get_caller_identity");
        let output = self
            .runtime
            .block_on(self.sts.get_caller_identity().send().instrument(span))
            .map_err(|e| ProviderError::new("GetCallerIdentity", DisplayErrorContext(&e).to_string()))?;
        output
            .account()
            .map(str::to_owned)
            .ok_or_else(|| ProviderError::new("GetCallerIdentity", "response carried no account"))
    }
}

/// `None` when the listing omitted the function name.
fn record_from(config: &FunctionConfiguration) -> Option<FunctionRecord> {
    let Some(name) = config.function_name() else {
        warn!(arn = ?config.function_arn(), "listed function has no name, ignoring");
        return None;
    };
    let variables: BTreeMap<String, String> = config
        .environment()
        .and_then(|env| env.variables())
        .map(|vars| vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    Some(FunctionRecord {
        name: FunctionName::from(name),
        arn: config.function_arn().unwrap_or_default().to_string(),
        runtime: config.runtime().map(|r| r.as_str().to_string()),
        layers: config
            .layers()
            .iter()
            .filter_map(|l| l.arn())
            .map(LayerArn::from)
            .collect(),
        variables,
    })
}
