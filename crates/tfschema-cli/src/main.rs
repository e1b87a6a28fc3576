//! # tfschema CLI entry point
//!
//! Parses command-line arguments, loads the optional config file and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tfschema_cli::config::CliConfig;
use tfschema_cli::convert::{run_convert, ConvertArgs};
use tfschema_cli::functions::{run_functions, FunctionsArgs};
use tfschema_cli::merge::{run_merge, MergeArgs};
use tfschema_cli::resolve::{run_resolve, ResolveArgs};

/// Schema resolution and composition for configuration-language tooling.
///
/// Resolves language versions, converts plugin schema documents and
/// composes the schema of a configuration unit from its metadata.
#[derive(Parser, Debug)]
#[command(name = "tfschema", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file with flag defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the language version of a schema family.
    Resolve(ResolveArgs),

    /// Convert a provider schemas document to the internal model.
    Convert(ConvertArgs),

    /// Compose the schema of one configuration unit.
    Merge(MergeArgs),

    /// Merge plugin functions into the built-in function set.
    Functions(FunctionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Resolve(args) => run_resolve(args, &config),
        Commands::Convert(args) => run_convert(args, &config),
        Commands::Merge(args) => run_merge(args, &config),
        Commands::Functions(args) => run_functions(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfschema_versions::SchemaFamily;

    #[test]
    fn cli_parse_resolve() {
        let cli = Cli::try_parse_from([
            "tfschema",
            "resolve",
            "--family",
            "stack",
            "--constraint",
            "~> 1.9",
        ])
        .unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.family, Some(SchemaFamily::Stack));
        assert_eq!(args.version.constraint.as_deref(), Some("~> 1.9"));
        assert!(args.version.language_version.is_none());
    }

    #[test]
    fn cli_parse_subcommand_version_flag() {
        let cli = Cli::try_parse_from(["tfschema", "resolve", "--version", "1.6.2"]).unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.version.language_version.as_deref(), Some("1.6.2"));
    }

    #[test]
    fn cli_parse_merge() {
        let cli = Cli::try_parse_from([
            "tfschema",
            "merge",
            "--family",
            "policy-test",
            "--providers",
            "schemas.json",
            "--unit",
            "unit.yaml",
            "--unit-dir",
            "units",
        ])
        .unwrap();
        let Commands::Merge(args) = cli.command else {
            panic!("expected merge");
        };
        assert_eq!(args.family, Some(SchemaFamily::PolicyTest));
        assert_eq!(args.providers, Some(PathBuf::from("schemas.json")));
        assert_eq!(args.unit, PathBuf::from("unit.yaml"));
        assert_eq!(args.unit_dir, Some(PathBuf::from("units")));
    }

    #[test]
    fn cli_parse_merge_requires_unit() {
        assert!(Cli::try_parse_from(["tfschema", "merge", "--family", "core"]).is_err());
    }

    #[test]
    fn cli_parse_unknown_family_errors() {
        assert!(Cli::try_parse_from(["tfschema", "resolve", "--family", "nomad"]).is_err());
    }

    #[test]
    fn cli_parse_convert_positional() {
        let cli = Cli::try_parse_from(["tfschema", "convert", "providers.json"]).unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.input, Some(PathBuf::from("providers.json")));
    }

    #[test]
    fn cli_parse_functions() {
        let cli = Cli::try_parse_from(["tfschema", "functions", "--unit", "unit.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Functions(_)));
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli0 = Cli::try_parse_from(["tfschema", "resolve"]).unwrap();
        assert_eq!(cli0.verbose, 0);

        let cli2 = Cli::try_parse_from(["tfschema", "-vv", "resolve"]).unwrap();
        assert_eq!(cli2.verbose, 2);

        let cli3 = Cli::try_parse_from(["tfschema", "resolve", "-vvv"]).unwrap();
        assert_eq!(cli3.verbose, 3);
    }

    #[test]
    fn cli_parse_config_option() {
        let cli =
            Cli::try_parse_from(["tfschema", "--config", "tfschema.yaml", "resolve"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("tfschema.yaml")));
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["tfschema"]).is_err());
    }
}
