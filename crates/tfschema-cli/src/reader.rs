//! # File-Backed State Reader
//!
//! Serves plugin schemas from one converted provider schemas document and
//! child-unit metadata from a directory tree. A call whose unit path is
//! `./net` is looked up as `<unit-dir>/net/unit.yaml` (or `unit.yml`,
//! `unit.json`). Metadata files are read on demand.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tfschema_convert::parse_provider_schemas;
use tfschema_core::{PluginAddr, PluginSchema};
use tfschema_merge::{LookupError, StateReader, UnitMeta};
use tfschema_versions::Constraints;

/// File names tried in a unit directory, in order.
pub const UNIT_FILE_NAMES: [&str; 3] = ["unit.yaml", "unit.yml", "unit.json"];

/// Reader over a provider schemas document and a unit directory.
#[derive(Debug, Default)]
pub struct FileStateReader {
    plugins: BTreeMap<PluginAddr, PluginSchema>,
    unit_dir: Option<PathBuf>,
}

impl FileStateReader {
    /// Load plugin schemas from `providers` and serve units below `unit_dir`.
    pub fn load(providers: Option<&Path>, unit_dir: Option<&Path>) -> Result<Self> {
        let plugins = match providers {
            Some(path) => {
                let bytes = std::fs::read(path).with_context(|| {
                    format!("failed to read provider schemas: {}", path.display())
                })?;
                parse_provider_schemas(&bytes).with_context(|| {
                    format!("failed to convert provider schemas: {}", path.display())
                })?
            }
            None => BTreeMap::new(),
        };
        tracing::info!(plugins = plugins.len(), "loaded plugin schemas");
        Ok(Self {
            plugins,
            unit_dir: unit_dir.map(Path::to_path_buf),
        })
    }

    /// Plugins available to every unit.
    pub fn plugins(&self) -> &BTreeMap<PluginAddr, PluginSchema> {
        &self.plugins
    }

    fn unit_file(&self, path: &str) -> Option<PathBuf> {
        let dir = self.unit_dir.as_ref()?.join(path);
        UNIT_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}

impl StateReader for FileStateReader {
    fn plugin_schema(
        &self,
        _unit_path: &str,
        addr: &PluginAddr,
        constraint: Option<&Constraints>,
    ) -> Result<PluginSchema, LookupError> {
        if let Some(constraint) = constraint {
            // Provider schema documents carry no plugin release versions.
            tracing::debug!(plugin = %addr, %constraint, "constraint not checked");
        }
        self.plugins
            .get(addr)
            .cloned()
            .ok_or_else(|| LookupError::PluginNotFound(addr.clone()))
    }

    fn unit_meta(&self, path: &str) -> Result<UnitMeta, LookupError> {
        let file = self
            .unit_file(path)
            .ok_or_else(|| LookupError::UnitNotFound(path.to_string()))?;
        let mut meta = crate::read_unit(&file)
            .map_err(|e| LookupError::Backend(format!("{e:#}")))?;
        if meta.path.path.is_empty() {
            meta.path.path = path.to_string();
        }
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDERS: &str = r#"{
        "format_version": "1.0",
        "provider_schemas": {
            "registry.terraform.io/hashicorp/random": {
                "provider": {"version": 0, "block": {}},
                "resource_schemas": {
                    "random_pet": {
                        "version": 0,
                        "block": {
                            "attributes": {
                                "length": {"type": "number", "optional": true}
                            }
                        }
                    }
                }
            }
        }
    }"#;

    #[test]
    fn serves_converted_plugins() {
        let dir = tempfile::tempdir().unwrap();
        let providers = dir.path().join("providers.json");
        std::fs::write(&providers, PROVIDERS).unwrap();

        let reader = FileStateReader::load(Some(&providers), None).unwrap();
        let random = PluginAddr::new("hashicorp", "random");
        let schema = reader.plugin_schema("", &random, None).unwrap();
        assert!(schema.resources.contains_key("random_pet"));
        assert_eq!(
            reader.plugin_schema("", &PluginAddr::new("hashicorp", "aws"), None),
            Err(LookupError::PluginNotFound(PluginAddr::new("hashicorp", "aws")))
        );
    }

    #[test]
    fn units_are_read_from_the_unit_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("net")).unwrap();
        std::fs::write(
            dir.path().join("net/unit.yml"),
            "variables:\n  cidr:\n    type: string\n",
        )
        .unwrap();

        let reader = FileStateReader::load(None, Some(dir.path())).unwrap();
        let meta = reader.unit_meta("./net").unwrap();
        assert_eq!(meta.path.path, "./net");
        assert!(meta.variables.contains_key("cidr"));
        assert_eq!(
            reader.unit_meta("./gone"),
            Err(LookupError::UnitNotFound("./gone".into()))
        );
    }

    #[test]
    fn malformed_unit_is_a_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bad")).unwrap();
        std::fs::write(dir.path().join("bad/unit.json"), "variables: [").unwrap();

        let reader = FileStateReader::load(None, Some(dir.path())).unwrap();
        assert!(matches!(reader.unit_meta("bad"), Err(LookupError::Backend(_))));
    }

    #[test]
    fn missing_providers_file_is_an_error() {
        let err = FileStateReader::load(Some(Path::new("/nonexistent/providers.json")), None)
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to read provider schemas"));
    }
}
