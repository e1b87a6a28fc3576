//! # Body, Block and Attribute Schemas
//!
//! The schema tree describing one configuration body: which attributes and
//! which (labelled) blocks may appear, and what each of them accepts.
//!
//! A `BlockSchema` may carry *dependent bodies*: additional body fragments
//! that only apply when the syntactic facts encoded in a [`SchemaKey`] hold
//! at the block (label values, attribute expressions). These are how plugin
//! shapes are attached to `resource "aws_instance" "x"` without mutating the
//! static shape of `resource`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::constraint::Constraint;
use crate::markup::MarkupContent;
use crate::schema_key::SchemaKey;
use crate::targetable::{ScopeId, Targetable};
use crate::types::Type;

/// Cardinality/shape of a nested block or nested attribute type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestingMode {
    /// At most one instance, an object.
    #[default]
    Single,
    /// Ordered instances.
    List,
    /// Unordered, unique instances.
    Set,
    /// Instances keyed by a label.
    Map,
}

/// Schema of a configuration body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BodySchema {
    /// Block type name to block schema.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub blocks: BTreeMap<String, BlockSchema>,
    /// Attribute name to attribute schema.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeSchema>,
    /// Schema for attributes of any name (e.g. `locals`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_attribute: Option<Box<AttributeSchema>>,
    /// Short detail, e.g. the plugin that contributed this body.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
    /// Description of the body.
    #[serde(skip_serializing_if = "MarkupContent::is_empty")]
    pub description: MarkupContent,
    /// Documentation URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_link: Option<String>,
    /// Whether the whole body is deprecated.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_deprecated: bool,
    /// Navigation target of the body (e.g. a called unit's location).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Target>,
    /// Reference targets the enclosing block becomes addressable as.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targetable_as: Vec<Targetable>,
}

/// Schema of a block type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockSchema {
    /// Labels following the block type name.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelSchema>,
    /// How many instances may appear and how they are shaped.
    pub nesting: NestingMode,
    /// Static body shape.
    pub body: BodySchema,
    /// Conditional body fragments keyed by applicability conditions.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependent_body: BTreeMap<SchemaKey, BodySchema>,
    /// Description of the block.
    #[serde(skip_serializing_if = "MarkupContent::is_empty")]
    pub description: MarkupContent,
    /// Whether the block is deprecated.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_deprecated: bool,
    /// Minimum number of instances, 0 for unbounded.
    #[serde(skip_serializing_if = "is_zero")]
    pub min_items: u64,
    /// Maximum number of instances, 0 for unbounded.
    #[serde(skip_serializing_if = "is_zero")]
    pub max_items: u64,
}

/// Schema of one block label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelSchema {
    /// Label name, e.g. `type`.
    pub name: String,
    /// Description of the label.
    #[serde(skip_serializing_if = "MarkupContent::is_empty")]
    pub description: MarkupContent,
    /// Whether the label value participates in dependent body lookup.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_dep_key: bool,
    /// Whether label values can be completed.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub completable: bool,
}

/// Schema of one attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeSchema {
    /// Description of the attribute.
    #[serde(skip_serializing_if = "MarkupContent::is_empty")]
    pub description: MarkupContent,
    /// Must be present.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_required: bool,
    /// May be present.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_optional: bool,
    /// Value is computed by the plugin.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_computed: bool,
    /// Value is sensitive.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_sensitive: bool,
    /// Attribute is deprecated.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_deprecated: bool,
    /// Whether the attribute's expression participates in dependent body lookup.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_dep_key: bool,
    /// Acceptable expressions.
    pub constraint: Constraint,
    /// Where the value of this attribute flows to (e.g. `var.name` in a called unit).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_for_target: Option<PathTarget>,
}

/// A configuration unit location and the language it is written in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitPath {
    /// Directory of the unit.
    pub path: String,
    /// Language identifier of the unit's files.
    pub language_id: String,
}

/// A position in a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePos {
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    /// 0-based byte offset.
    pub byte: u32,
}

/// A range in a source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    /// File name relative to the unit path.
    pub filename: String,
    /// Start position.
    pub start: SourcePos,
    /// End position.
    pub end: SourcePos,
}

impl SourceRange {
    /// The range at the very beginning of a file.
    pub fn file_start(filename: impl Into<String>) -> Self {
        let start = SourcePos {
            line: 1,
            column: 1,
            byte: 0,
        };
        Self {
            filename: filename.into(),
            start,
            end: start,
        }
    }
}

/// An attribute's value flows into a target address in another unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathTarget {
    /// Address inside the target unit, e.g. `var.region`.
    pub address: Address,
    /// Target unit.
    pub path: UnitPath,
    /// Declaration range of the target, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
    /// Scope of the target address.
    pub scope_id: ScopeId,
    /// Type of the target.
    pub as_type: Type,
}

/// Navigation target of a body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Target {
    /// Target unit.
    pub path: UnitPath,
    /// Range to navigate to.
    pub range: SourceRange,
}

impl BlockSchema {
    /// Dependent body registered under exactly this key.
    ///
    /// Returns `None` for unregistered keys, never an empty placeholder.
    pub fn dependent_body(&self, key: &SchemaKey) -> Option<&BodySchema> {
        self.dependent_body.get(key)
    }
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema_key::{DependencyKeys, LabelDependent};

    #[test]
    fn clone_is_deep() {
        let mut original = BodySchema::default();
        original.blocks.insert("resource".into(), BlockSchema::default());

        let mut copy = original.clone();
        let key = SchemaKey::new(&DependencyKeys {
            labels: vec![LabelDependent::new(0, "x")],
            attributes: vec![],
        })
        .unwrap();
        copy.blocks
            .get_mut("resource")
            .unwrap()
            .dependent_body
            .insert(key, BodySchema::default());

        assert!(original.blocks["resource"].dependent_body.is_empty());
        assert_ne!(original, copy);
    }

    #[test]
    fn unregistered_key_is_not_found() {
        let block = BlockSchema::default();
        let key = SchemaKey::new(&DependencyKeys {
            labels: vec![LabelDependent::new(0, "nope")],
            attributes: vec![],
        })
        .unwrap();
        assert!(block.dependent_body(&key).is_none());
    }

    #[test]
    fn nesting_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&NestingMode::Set).unwrap(), r#""set""#);
    }
}
