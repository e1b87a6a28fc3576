//! # Unit Metadata
//!
//! What the composition engine needs to know about a configuration unit,
//! harvested elsewhere and handed in through a
//! [`StateReader`](crate::reader::StateReader): declared plugin references
//! and requirements, variables, outputs and calls to child units.
//!
//! All types are serde documents so metadata can be fed from JSON or YAML.
//! Plugin references serialize as `"local"` / `"local.alias"` keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tfschema_core::{PluginAddr, PluginRef, SourceRange, Type, UnitPath};
use tfschema_versions::{builtin_addr, Constraints, BUILTIN_LOCAL_NAME};

/// Harvested metadata of one configuration unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitMeta {
    /// Location and language of the unit.
    #[serde(default)]
    pub path: UnitPath,
    /// Files making up the unit, in declaration order.
    #[serde(default)]
    pub filenames: Vec<String>,
    /// Local plugin references and the plugin each one points at.
    #[serde(default)]
    pub plugin_references: BTreeMap<PluginRef, PluginAddr>,
    /// Version requirements per plugin.
    #[serde(default)]
    pub plugin_requirements: BTreeMap<PluginAddr, Constraints>,
    /// Input variables.
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
    /// Outputs.
    #[serde(default)]
    pub outputs: BTreeMap<String, Output>,
    /// Calls to child units (module calls, stack components) by name.
    #[serde(default)]
    pub calls: BTreeMap<String, UnitCall>,
}

impl UnitMeta {
    /// Add the built-in plugin under its usual local name unless the unit
    /// already references it.
    pub fn with_builtin_reference(mut self) -> Self {
        let builtin = builtin_addr();
        if !self.plugin_references.values().any(|addr| *addr == builtin) {
            self.plugin_references
                .insert(PluginRef::new(BUILTIN_LOCAL_NAME), builtin);
        }
        self
    }
}

/// An input variable declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Declared type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,
    /// Default value. An explicit `null` is `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
    /// Whether the value is sensitive.
    #[serde(rename = "sensitive", default)]
    pub is_sensitive: bool,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Declaration range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

impl Variable {
    /// Whether a caller must supply a value.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// The variable's effective type: declared, else inferred from the
    /// default, else `dynamic`.
    pub fn effective_type(&self) -> Type {
        match (&self.ty, &self.default) {
            (Some(ty), _) => ty.clone(),
            (None, Some(default)) => Type::of_value(default),
            (None, None) => Type::Dynamic,
        }
    }
}

/// An output declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Statically known value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Declared or inferred type when no static value is known.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,
    /// Whether the value is sensitive.
    #[serde(rename = "sensitive", default)]
    pub is_sensitive: bool,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// A call to a child unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCall {
    /// Source address exactly as written in the `source` attribute.
    pub source: String,
    /// Version constraint of a registry source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Directory the child unit was installed to, when it differs from the
    /// source (registry and remote sources).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl UnitCall {
    /// Path under which the child unit's metadata is looked up.
    pub fn unit_path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.source)
    }
}

/// Distinguish an absent field from an explicit `null`.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_null_default_is_a_default() {
        let var: Variable = serde_json::from_str(r#"{"default": null}"#).unwrap();
        assert_eq!(var.default, Some(Value::Null));
        assert!(!var.is_required());

        let var: Variable = serde_json::from_str("{}").unwrap();
        assert!(var.is_required());
    }

    #[test]
    fn effective_type_prefers_declaration() {
        let declared: Variable =
            serde_json::from_str(r#"{"type": ["list", "string"], "default": "x"}"#).unwrap();
        assert_eq!(declared.effective_type(), Type::list(Type::String));

        let inferred: Variable = serde_json::from_str(r#"{"default": "bar"}"#).unwrap();
        assert_eq!(inferred.effective_type(), Type::String);

        assert_eq!(Variable::default().effective_type(), Type::Dynamic);
    }

    #[test]
    fn plugin_maps_use_string_keys() {
        let meta: UnitMeta = serde_json::from_str(
            r#"{
                "path": {"path": "app", "language_id": "terraform"},
                "plugin_references": {"aws": "hashicorp/aws", "aws.west": "hashicorp/aws"},
                "plugin_requirements": {"hashicorp/aws": "~> 5.0"}
            }"#,
        )
        .unwrap();
        assert_eq!(meta.plugin_references.len(), 2);
        let aws = PluginAddr::new("hashicorp", "aws");
        assert_eq!(meta.plugin_references[&PluginRef::aliased("aws", "west")], aws);
        assert_eq!(meta.plugin_requirements[&aws].as_str(), "~> 5.0");
    }

    #[test]
    fn builtin_reference_is_added_once() {
        let meta = UnitMeta::default().with_builtin_reference();
        assert_eq!(meta.plugin_references[&PluginRef::new("terraform")], builtin_addr());

        let mut custom = UnitMeta::default();
        custom
            .plugin_references
            .insert(PluginRef::new("tf"), builtin_addr());
        let custom = custom.with_builtin_reference();
        assert_eq!(custom.plugin_references.len(), 1);
    }

    #[test]
    fn call_path_falls_back_to_source() {
        let local = UnitCall {
            source: "./net".into(),
            ..UnitCall::default()
        };
        assert_eq!(local.unit_path(), "./net");
        let registry = UnitCall {
            source: "terraform-aws-modules/vpc/aws".into(),
            version: Some("5.1.0".into()),
            path: Some(".terraform/modules/vpc".into()),
        };
        assert_eq!(registry.unit_path(), ".terraform/modules/vpc");
    }
}
