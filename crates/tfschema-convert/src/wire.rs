//! # Wire Format
//!
//! Serde mirror of the plugin schema JSON emitted by `providers schema
//! -json`. Unknown fields are ignored; missing collections default to empty.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// The multi-plugin document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSchemasDocument {
    /// Document format version, e.g. `1.0`.
    #[serde(default)]
    pub format_version: String,
    /// Plugin address to plugin schema.
    #[serde(default)]
    pub provider_schemas: BTreeMap<String, WirePluginSchema>,
}

/// Schema of one plugin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WirePluginSchema {
    /// Configuration shape of the plugin itself.
    #[serde(default)]
    pub provider: Option<WireSchema>,
    /// Resource shapes.
    #[serde(default)]
    pub resource_schemas: BTreeMap<String, WireSchema>,
    /// Data source shapes.
    #[serde(default)]
    pub data_source_schemas: BTreeMap<String, WireSchema>,
    /// Ephemeral resource shapes.
    #[serde(default)]
    pub ephemeral_resource_schemas: BTreeMap<String, WireSchema>,
    /// Function signatures.
    #[serde(default)]
    pub functions: BTreeMap<String, WireFunction>,
}

/// A versioned top-level block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireSchema {
    /// Schema version of the shape.
    #[serde(default)]
    pub version: i64,
    /// The shape itself.
    #[serde(default)]
    pub block: WireBlock,
}

/// Kind of a description text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionKind {
    /// Plain text.
    #[default]
    Plain,
    /// Markdown.
    Markdown,
}

/// A block: attributes and nested block types.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireBlock {
    #[serde(default)]
    pub attributes: BTreeMap<String, WireAttribute>,
    #[serde(default)]
    pub block_types: BTreeMap<String, WireNestedBlock>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_kind: DescriptionKind,
    #[serde(default)]
    pub deprecated: bool,
}

/// An attribute: exactly one of `type` and `nested_type` is expected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireAttribute {
    #[serde(rename = "type", default)]
    pub ty: Option<Value>,
    #[serde(default)]
    pub nested_type: Option<WireNestedType>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_kind: DescriptionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub deprecated: bool,
}

/// Nesting mode of a nested attribute type or nested block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireNesting {
    Single,
    Group,
    List,
    Set,
    Map,
}

/// Structural type of a nested attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct WireNestedType {
    #[serde(default)]
    pub attributes: BTreeMap<String, WireAttribute>,
    pub nesting_mode: WireNesting,
    #[serde(default)]
    pub min_items: u64,
    #[serde(default)]
    pub max_items: u64,
}

/// A nested block type.
#[derive(Debug, Clone, Deserialize)]
pub struct WireNestedBlock {
    pub nesting_mode: WireNesting,
    #[serde(default)]
    pub block: WireBlock,
    #[serde(default)]
    pub min_items: u64,
    #[serde(default)]
    pub max_items: u64,
}

/// A function signature.
#[derive(Debug, Clone, Deserialize)]
pub struct WireFunction {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description_kind: DescriptionKind,
    pub return_type: Value,
    #[serde(default)]
    pub parameters: Vec<WireParameter>,
    #[serde(default)]
    pub variadic_parameter: Option<WireParameter>,
}

/// One function parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct WireParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Value,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_nullable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collections_default_to_empty() {
        let schema: WirePluginSchema = serde_json::from_str("{}").unwrap();
        assert!(schema.provider.is_none());
        assert!(schema.resource_schemas.is_empty());
        assert!(schema.functions.is_empty());
    }

    #[test]
    fn nesting_modes_decode() {
        let block: WireNestedBlock =
            serde_json::from_str(r#"{"nesting_mode":"group","block":{}}"#).unwrap();
        assert_eq!(block.nesting_mode, WireNesting::Group);
        assert!(serde_json::from_str::<WireNestedBlock>(r#"{"nesting_mode":"tuple"}"#).is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let attr: WireAttribute =
            serde_json::from_str(r#"{"type":"string","optional":true,"write_only":true}"#).unwrap();
        assert!(attr.optional);
        assert_eq!(attr.ty, Some(Value::String("string".into())));
    }
}
