//! # Schema Keys — Canonical Applicability Conditions
//!
//! A `SchemaKey` indexes a dependent body by the exact combination of
//! syntactic facts that must hold at a block for the body to apply:
//!
//! - "label at position N equals V" (`resource "aws_instance" ...`)
//! - "attribute A's expression is the address X" (`provider = aws.west`)
//! - "attribute A's expression is the static value S" (`backend = "s3"`)
//!
//! ## Invariant
//!
//! The only constructor is [`SchemaKey::new`]. It sorts and de-duplicates the
//! condition set and serializes it with JSON Canonicalization Scheme
//! (RFC 8785), so two condition sets that are set-equal always produce the
//! same key, regardless of construction order.
//!
//! ## Encoding
//!
//! ```text
//! {"attrs":[{"expr":{"addr":"aws.west"},"name":"provider"}],"labels":[{"index":0,"value":"aws_instance"}]}
//! ```
//!
//! Empty condition lists are omitted from the encoding.

use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};

use crate::address::Address;
use crate::error::SchemaKeyError;

/// "Label at `index` equals `value`".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelDependent {
    /// Zero-based label position.
    pub index: usize,
    /// Required label value.
    pub value: String,
}

impl LabelDependent {
    /// Construct a label condition.
    pub fn new(index: usize, value: impl Into<String>) -> Self {
        Self {
            index,
            value: value.into(),
        }
    }
}

/// The expression an attribute condition matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionValue {
    /// A traversal such as `aws.west`.
    Address(Address),
    /// A static literal such as `"s3"`.
    Static(Value),
}

impl ExpressionValue {
    /// A static string literal.
    pub fn static_string(value: impl Into<String>) -> Self {
        Self::Static(Value::String(value.into()))
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Address(addr) => json!({ "addr": addr.to_string() }),
            Self::Static(value) => json!({ "static": value }),
        }
    }
}

/// "Attribute `name`'s expression equals `expr`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDependent {
    /// Attribute name.
    pub name: String,
    /// Required expression.
    pub expr: ExpressionValue,
}

impl AttributeDependent {
    /// Construct an attribute condition.
    pub fn new(name: impl Into<String>, expr: ExpressionValue) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }
}

/// A set of applicability conditions, in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyKeys {
    /// Label conditions.
    pub labels: Vec<LabelDependent>,
    /// Attribute conditions.
    pub attributes: Vec<AttributeDependent>,
}

impl DependencyKeys {
    /// Add a label condition.
    pub fn with_label(mut self, index: usize, value: impl Into<String>) -> Self {
        self.labels.push(LabelDependent::new(index, value));
        self
    }

    /// Add an attribute condition.
    pub fn with_attribute(mut self, name: impl Into<String>, expr: ExpressionValue) -> Self {
        self.attributes.push(AttributeDependent::new(name, expr));
        self
    }
}

/// Canonical serialization of a [`DependencyKeys`] set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SchemaKey(String);

impl SchemaKey {
    /// Canonicalise a condition set.
    ///
    /// # Errors
    ///
    /// Returns `SchemaKeyError::SerializationFailed` if JCS serialization of
    /// a static expression value fails.
    pub fn new(keys: &DependencyKeys) -> Result<Self, SchemaKeyError> {
        let mut labels: Vec<(usize, &str)> = keys
            .labels
            .iter()
            .map(|l| (l.index, l.value.as_str()))
            .collect();
        labels.sort_unstable();
        labels.dedup();

        // (name, canonical expression text, expression value)
        let mut attrs = Vec::with_capacity(keys.attributes.len());
        for attr in &keys.attributes {
            let expr = attr.expr.to_json();
            let canonical = serde_jcs::to_string(&expr)?;
            attrs.push((attr.name.as_str(), canonical, expr));
        }
        attrs.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
        attrs.dedup_by(|a, b| a.0 == b.0 && a.1 == b.1);

        let mut doc = serde_json::Map::new();
        if !labels.is_empty() {
            let labels = labels
                .into_iter()
                .map(|(index, value)| json!({ "index": index, "value": value }))
                .collect();
            doc.insert("labels".into(), Value::Array(labels));
        }
        if !attrs.is_empty() {
            let attrs = attrs
                .into_iter()
                .map(|(name, _, expr)| json!({ "name": name, "expr": expr }))
                .collect();
            doc.insert("attrs".into(), Value::Array(attrs));
        }

        Ok(Self(serde_jcs::to_string(&Value::Object(doc))?))
    }

    /// The canonical text of this key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_addr() -> ExpressionValue {
        ExpressionValue::Address(Address::root("aws").attr("west"))
    }

    #[test]
    fn encoding_is_sorted_and_compact() {
        let keys = DependencyKeys::default()
            .with_attribute("provider", provider_addr())
            .with_label(0, "aws_instance");
        let key = SchemaKey::new(&keys).unwrap();
        assert_eq!(
            key.as_str(),
            r#"{"attrs":[{"expr":{"addr":"aws.west"},"name":"provider"}],"labels":[{"index":0,"value":"aws_instance"}]}"#
        );
    }

    #[test]
    fn order_of_construction_does_not_matter() {
        let a = DependencyKeys::default()
            .with_label(1, "b")
            .with_label(0, "a")
            .with_attribute("backend", ExpressionValue::static_string("s3"))
            .with_attribute("provider", provider_addr());
        let b = DependencyKeys::default()
            .with_attribute("provider", provider_addr())
            .with_label(0, "a")
            .with_attribute("backend", ExpressionValue::static_string("s3"))
            .with_label(1, "b");
        assert_eq!(SchemaKey::new(&a).unwrap(), SchemaKey::new(&b).unwrap());
    }

    #[test]
    fn duplicate_conditions_collapse() {
        let once = DependencyKeys::default().with_label(0, "x");
        let twice = DependencyKeys::default().with_label(0, "x").with_label(0, "x");
        assert_eq!(SchemaKey::new(&once).unwrap(), SchemaKey::new(&twice).unwrap());
    }

    #[test]
    fn address_and_static_differ() {
        let addr = DependencyKeys::default()
            .with_attribute("source", ExpressionValue::Address(Address::root("x")));
        let stat = DependencyKeys::default().with_attribute("source", ExpressionValue::static_string("x"));
        assert_ne!(SchemaKey::new(&addr).unwrap(), SchemaKey::new(&stat).unwrap());
    }

    #[test]
    fn empty_set_is_empty_object() {
        let key = SchemaKey::new(&DependencyKeys::default()).unwrap();
        assert_eq!(key.as_str(), "{}");
    }
}
