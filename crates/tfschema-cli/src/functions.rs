//! # Functions Subcommand
//!
//! `tfschema functions [--version V] --unit <file> [--providers <file>]`
//! prints the built-in function set of the resolved version merged with
//! the functions of every plugin the unit references.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tfschema_merge::FunctionsMerger;
use tfschema_versions::{FunctionTable, SchemaFamily, FUNCTIONS};

use crate::config::CliConfig;
use crate::reader::FileStateReader;
use crate::VersionArgs;

/// Arguments for the functions subcommand.
#[derive(Args, Debug)]
pub struct FunctionsArgs {
    #[command(flatten)]
    pub version: VersionArgs,

    /// Provider schemas document.
    #[arg(long)]
    pub providers: Option<PathBuf>,

    /// Metadata of the unit whose functions to list (YAML or JSON).
    #[arg(long)]
    pub unit: PathBuf,
}

/// Execute the functions subcommand.
pub fn run_functions(args: &FunctionsArgs, config: &CliConfig) -> Result<u8> {
    let functions = merged_functions(args, config)?;
    crate::print_json(&functions)?;
    Ok(0)
}

/// Merge the unit's functions without printing them.
pub fn merged_functions(args: &FunctionsArgs, config: &CliConfig) -> Result<FunctionTable> {
    // Functions are a language feature, so versions follow the module family.
    let version = args.version.resolve(SchemaFamily::Core, config)?;
    let core = FUNCTIONS.get(&version)?;
    let reader = FileStateReader::load(config.providers(args.providers.as_deref()), None)?;
    let meta = crate::read_unit(&args.unit)?.with_builtin_reference();

    FunctionsMerger::new(&reader)
        .with_core_functions(core, version)
        .functions_for_unit(&meta)
        .context("failed to merge functions")
}
