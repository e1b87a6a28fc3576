//! # State Reader
//!
//! The mergers never load anything themselves. Plugin schemas and child-unit
//! metadata arrive through a [`StateReader`]:
//!
//! - [`MemoryStateReader`]: everything held in maps, for embedding and tests.
//!
//! Implementations may be slow, cached or fallible. A failed lookup only
//! removes that one contributor from the composed schema.

use std::collections::BTreeMap;

use tfschema_core::{PluginAddr, PluginSchema};
use tfschema_versions::Constraints;

use crate::error::LookupError;
use crate::meta::UnitMeta;

/// Source of plugin schemas and unit metadata.
pub trait StateReader: Send + Sync {
    /// The schema of `addr` as installed for the unit at `unit_path`,
    /// satisfying `constraint` when given.
    fn plugin_schema(
        &self,
        unit_path: &str,
        addr: &PluginAddr,
        constraint: Option<&Constraints>,
    ) -> Result<PluginSchema, LookupError>;

    /// Harvested metadata of the unit at `path`.
    fn unit_meta(&self, path: &str) -> Result<UnitMeta, LookupError>;
}

// ─── MemoryStateReader ──────────────────────────────────────────────────

/// Reader over in-memory maps.
///
/// Plugin schemas are shared by every unit path; constraints are not
/// checked against anything, since a map holds one schema per plugin.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateReader {
    plugins: BTreeMap<PluginAddr, PluginSchema>,
    units: BTreeMap<String, UnitMeta>,
}

impl MemoryStateReader {
    /// An empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a plugin schema.
    pub fn with_plugin(mut self, addr: PluginAddr, schema: PluginSchema) -> Self {
        self.plugins.insert(addr, schema);
        self
    }

    /// Add or replace many plugin schemas.
    pub fn with_plugins(mut self, plugins: impl IntoIterator<Item = (PluginAddr, PluginSchema)>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// Add or replace unit metadata, keyed by its own path.
    pub fn with_unit(mut self, meta: UnitMeta) -> Self {
        self.units.insert(meta.path.path.clone(), meta);
        self
    }

    /// Add or replace unit metadata under an explicit path.
    pub fn with_unit_at(mut self, path: impl Into<String>, meta: UnitMeta) -> Self {
        self.units.insert(path.into(), meta);
        self
    }
}

impl StateReader for MemoryStateReader {
    fn plugin_schema(
        &self,
        _unit_path: &str,
        addr: &PluginAddr,
        _constraint: Option<&Constraints>,
    ) -> Result<PluginSchema, LookupError> {
        self.plugins
            .get(addr)
            .cloned()
            .ok_or_else(|| LookupError::PluginNotFound(addr.clone()))
    }

    fn unit_meta(&self, path: &str) -> Result<UnitMeta, LookupError> {
        self.units
            .get(path)
            .cloned()
            .ok_or_else(|| LookupError::UnitNotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfschema_core::UnitPath;

    #[test]
    fn missing_entries_are_lookup_errors() {
        let reader = MemoryStateReader::new();
        let aws = PluginAddr::new("hashicorp", "aws");
        assert_eq!(
            reader.plugin_schema("app", &aws, None),
            Err(LookupError::PluginNotFound(aws))
        );
        assert_eq!(
            reader.unit_meta("./net"),
            Err(LookupError::UnitNotFound("./net".into()))
        );
    }

    #[test]
    fn units_are_keyed_by_path() {
        let meta = UnitMeta {
            path: UnitPath {
                path: "./net".into(),
                language_id: "terraform".into(),
            },
            ..UnitMeta::default()
        };
        let reader = MemoryStateReader::new()
            .with_unit(meta.clone())
            .with_unit_at(".terraform/modules/vpc", UnitMeta::default());
        assert_eq!(reader.unit_meta("./net").unwrap(), meta);
        assert!(reader.unit_meta(".terraform/modules/vpc").is_ok());
    }
}
