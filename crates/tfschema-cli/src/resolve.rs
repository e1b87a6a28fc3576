//! # Resolve Subcommand
//!
//! `tfschema resolve --family <family> [--version V] [--constraint C]`
//! prints the supported language version a family resolves to.

use anyhow::Result;
use clap::Args;
use tfschema_versions::SchemaFamily;

use crate::config::CliConfig;
use crate::VersionArgs;

/// Arguments for the resolve subcommand.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Schema family: core, test, stack, policy or policy-test.
    #[arg(long)]
    pub family: Option<SchemaFamily>,

    #[command(flatten)]
    pub version: VersionArgs,
}

/// Execute the resolve subcommand.
pub fn run_resolve(args: &ResolveArgs, config: &CliConfig) -> Result<u8> {
    let family = config.family(args.family);
    let version = args.version.resolve(family, config)?;
    println!("{version}");
    Ok(0)
}
