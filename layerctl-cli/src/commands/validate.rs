//! `layerctl validate`: check the config without touching the provider.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use super::load_config;

#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    pub fn run(self, config_path: Option<&Path>) -> Result<()> {
        let config = load_config(config_path)?;
        println!("✓ config valid: {} on {}", config.operation, config.selection);
        if let Some(arn) = &config.layer_arn {
            println!("  layer    {arn}");
        }
        println!("  runtimes {}", config.runtimes.join(", "));
        Ok(())
    }
}
