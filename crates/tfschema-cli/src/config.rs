//! # CLI Configuration File
//!
//! Optional YAML file passed with `--config`, supplying defaults for flags
//! that are tedious to repeat:
//!
//! ```yaml
//! family: core
//! version: 1.6.0
//! constraint: ">= 1.3"
//! providers: .terraform/providers.json
//! ```
//!
//! Flags given on the command line always win over file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tfschema_versions::SchemaFamily;

/// Defaults read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Schema family.
    #[serde(default)]
    pub family: Option<SchemaFamily>,
    /// Exact language version.
    #[serde(default)]
    pub version: Option<String>,
    /// Version constraint.
    #[serde(default)]
    pub constraint: Option<String>,
    /// Plugin schema document.
    #[serde(default)]
    pub providers: Option<PathBuf>,
}

impl CliConfig {
    /// Load the file at `path`, or empty defaults without one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }

    /// `flag`, else the configured family, else the module family.
    pub fn family(&self, flag: Option<SchemaFamily>) -> SchemaFamily {
        flag.or(self.family).unwrap_or(SchemaFamily::Core)
    }

    /// `flag`, else the configured plugin schema document.
    pub fn providers<'a>(&'a self, flag: Option<&'a Path>) -> Option<&'a Path> {
        flag.or(self.providers.as_deref())
    }
}
