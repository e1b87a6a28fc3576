//! # Convert Subcommand
//!
//! `tfschema convert <providers.json>` converts every plugin of a provider
//! schemas document and prints the internal model keyed by plugin address.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tfschema_convert::parse_provider_schemas;

use crate::config::CliConfig;

/// Arguments for the convert subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Provider schemas document. Defaults to `providers` from the config file.
    pub input: Option<PathBuf>,
}

/// Execute the convert subcommand.
pub fn run_convert(args: &ConvertArgs, config: &CliConfig) -> Result<u8> {
    let Some(path) = config.providers(args.input.as_deref()) else {
        anyhow::bail!("no provider schemas document given");
    };
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read provider schemas: {}", path.display()))?;
    let plugins = parse_provider_schemas(&bytes)
        .with_context(|| format!("failed to convert provider schemas: {}", path.display()))?;
    tracing::info!(plugins = plugins.len(), "converted provider schemas");
    crate::print_json(&plugins)?;
    Ok(0)
}
