//! # tfschema-cli — Schema Inspection CLI
//!
//! Provides the `tfschema` command-line interface over the resolution and
//! composition crates. Every subcommand reads plain files and prints JSON
//! to stdout, so results can be diffed and piped.
//!
//! ## Subcommands
//!
//! - `tfschema resolve`: Pick the supported language version for a family.
//! - `tfschema convert`: Convert a plugin schema document to the internal model.
//! - `tfschema merge`: Compose the schema of one configuration unit.
//! - `tfschema functions`: Merge plugin functions into the built-in set.
//!
//! ```bash
//! tfschema resolve --family core --constraint "~> 1.5"
//! tfschema merge --family core --providers schemas.json --unit app/unit.yaml
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here, semantics live in the library crates.
//! - Errors are `anyhow` with file-path context; exit code 1 on failure.

pub mod config;
pub mod convert;
pub mod functions;
pub mod merge;
pub mod reader;
pub mod resolve;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tfschema_merge::UnitMeta;
use tfschema_versions::semver::Version;
use tfschema_versions::SchemaFamily;

use crate::config::CliConfig;

/// Version selection flags shared by every resolving subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct VersionArgs {
    /// Exact language version, e.g. "1.6.2". Clamped into the supported range.
    #[arg(long = "version", value_name = "VERSION")]
    pub language_version: Option<String>,

    /// Version constraint, e.g. ">= 1.3, < 1.8".
    #[arg(long)]
    pub constraint: Option<String>,
}

impl VersionArgs {
    /// Resolve against `family`, falling back to config file defaults.
    pub fn resolve(&self, family: SchemaFamily, config: &CliConfig) -> Result<Version> {
        let version = self.language_version.as_deref().or(config.version.as_deref());
        let constraint = self.constraint.as_deref().or(config.constraint.as_deref());
        let resolved = family
            .resolve(version, constraint)
            .with_context(|| format!("failed to resolve a {family} version"))?;
        tracing::info!(%family, %resolved, "resolved language version");
        Ok(resolved)
    }
}

/// Read and parse unit metadata. YAML is a superset of JSON, so both work.
pub fn read_unit(path: &Path) -> Result<UnitMeta> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read unit metadata: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse unit metadata: {}", path.display()))
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to serialize output")?;
    writeln!(stdout).context("failed to write output")?;
    Ok(())
}
