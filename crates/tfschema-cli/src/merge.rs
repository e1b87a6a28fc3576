//! # Merge Subcommand
//!
//! `tfschema merge --family <family> --unit <file> [--providers <file>]
//! [--unit-dir <dir>]` composes and prints the schema of one unit.
//!
//! Module units implicitly reference the built-in plugin, so its data
//! sources and remote-state backends are always present.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tfschema_core::BodySchema;
use tfschema_merge::{
    ModuleSchemaMerger, PolicySchemaMerger, StackSchemaMerger, TestKind, TestSchemaMerger,
};
use tfschema_versions::SchemaFamily;

use crate::config::CliConfig;
use crate::reader::FileStateReader;
use crate::VersionArgs;

/// Arguments for the merge subcommand.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Schema family: core, test, stack, policy or policy-test.
    #[arg(long)]
    pub family: Option<SchemaFamily>,

    #[command(flatten)]
    pub version: VersionArgs,

    /// Provider schemas document.
    #[arg(long)]
    pub providers: Option<PathBuf>,

    /// Metadata of the unit to compose (YAML or JSON).
    #[arg(long)]
    pub unit: PathBuf,

    /// Directory holding metadata of called units.
    #[arg(long)]
    pub unit_dir: Option<PathBuf>,
}

/// Execute the merge subcommand.
pub fn run_merge(args: &MergeArgs, config: &CliConfig) -> Result<u8> {
    let schema = compose(args, config)?;
    crate::print_json(&schema)?;
    Ok(0)
}

/// Compose the unit's schema without printing it.
pub fn compose(args: &MergeArgs, config: &CliConfig) -> Result<BodySchema> {
    let family = config.family(args.family);
    let version = args.version.resolve(family, config)?;
    let core = family.schema(&version)?;
    let reader = FileStateReader::load(
        config.providers(args.providers.as_deref()),
        args.unit_dir.as_deref(),
    )?;
    let meta = crate::read_unit(&args.unit)?;

    let schema = match family {
        SchemaFamily::Core => ModuleSchemaMerger::new(&reader)
            .with_core_schema(core, version)
            .schema_for_unit(&meta.with_builtin_reference()),
        SchemaFamily::Test => TestSchemaMerger::new(&reader, TestKind::Test)
            .with_core_schema(core)
            .schema_for_test(&meta),
        SchemaFamily::PolicyTest => TestSchemaMerger::new(&reader, TestKind::PolicyTest)
            .with_core_schema(core)
            .schema_for_test(&meta),
        SchemaFamily::Stack => StackSchemaMerger::new(&reader)
            .with_core_schema(core)
            .schema_for_stack(&meta),
        SchemaFamily::Policy => PolicySchemaMerger::new(&reader)
            .with_core_schema(core)
            .schema_for_policy(&meta),
    };
    schema.with_context(|| format!("failed to compose {family} schema"))
}
