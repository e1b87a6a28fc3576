//! # Constraint Expressions
//!
//! A `Constraint` describes which expressions are acceptable as the value
//! of an attribute: literal values of a type, references to values of a
//! type, keywords, or compound expressions wrapping the constraints of their
//! elements.
//!
//! `Constraint::for_type` is the single mapping from a declared [`Type`] to
//! its two-way constraint (`literal of T` or `reference to T`). Both the
//! plugin schema converter and the reference target builder go through it.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::schema::AttributeSchema;
use crate::targetable::ScopeId;
use crate::types::Type;

/// An expression constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Constraint {
    /// Any expression producing a value of the type.
    AnyExpression(Type),
    /// A literal value of the type.
    LiteralType(Type),
    /// One specific literal value.
    LiteralValue(Value),
    /// A reference (traversal) to an addressable value.
    Reference {
        /// Type the referenced value must have; `None` accepts any.
        of_type: Option<Type>,
        /// Scope the reference must point into; `None` accepts any.
        of_scope: Option<ScopeId>,
    },
    /// A type declaration such as `list(string)`.
    TypeDeclaration,
    /// A bare keyword such as `plan`.
    Keyword(String),
    /// `[ ... ]` with homogeneous elements.
    List {
        /// Element constraint.
        elem: Box<Constraint>,
        /// Minimum number of elements, 0 for unbounded.
        min_items: u64,
        /// Maximum number of elements, 0 for unbounded.
        max_items: u64,
    },
    /// `[ ... ]` interpreted as a set.
    Set {
        /// Element constraint.
        elem: Box<Constraint>,
        /// Minimum number of elements, 0 for unbounded.
        min_items: u64,
        /// Maximum number of elements, 0 for unbounded.
        max_items: u64,
    },
    /// `{ key = ... }` with arbitrary keys.
    Map {
        /// Element constraint.
        elem: Box<Constraint>,
    },
    /// `[ ... ]` with a constraint per position.
    Tuple(Vec<Constraint>),
    /// `{ name = ... }` with a fixed set of named attributes.
    Object(ObjectConstraint),
    /// Any one of the alternatives.
    OneOf(Vec<Constraint>),
}

/// Named attributes of an object expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectConstraint {
    /// Attribute name to attribute schema.
    pub attributes: BTreeMap<String, AttributeSchema>,
    /// Optional display name of the object type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Default for Constraint {
    fn default() -> Self {
        Self::AnyExpression(Type::Dynamic)
    }
}

impl Constraint {
    /// A reference to any value of the given type.
    pub fn reference_to(ty: Type) -> Self {
        Self::Reference {
            of_type: Some(ty),
            of_scope: None,
        }
    }

    /// A reference into the given scope.
    pub fn reference_into(scope: ScopeId) -> Self {
        Self::Reference {
            of_type: None,
            of_scope: Some(scope),
        }
    }

    /// The two-way constraint for a declared type: a literal of the type, or
    /// a reference to a value of the type.
    ///
    /// Collection and structural types recurse, so every element position
    /// accepts literals and references alike. Object attributes are required
    /// unless the type marks them optional.
    pub fn for_type(ty: &Type) -> Self {
        let literal = Self::literal_for_type(ty);
        Self::OneOf(vec![literal, Self::reference_to(ty.clone())])
    }

    fn literal_for_type(ty: &Type) -> Self {
        match ty {
            Type::String | Type::Number | Type::Bool | Type::Dynamic => Self::LiteralType(ty.clone()),
            Type::List(elem) => Self::List {
                elem: Box::new(Self::for_type(elem)),
                min_items: 0,
                max_items: 0,
            },
            Type::Set(elem) => Self::Set {
                elem: Box::new(Self::for_type(elem)),
                min_items: 0,
                max_items: 0,
            },
            Type::Map(elem) => Self::Map {
                elem: Box::new(Self::for_type(elem)),
            },
            Type::Tuple(elems) => Self::Tuple(elems.iter().map(Self::for_type).collect()),
            Type::Object { attributes, optional } => Self::Object(ObjectConstraint {
                attributes: attributes
                    .iter()
                    .map(|(name, attr_ty)| {
                        let is_optional = optional.contains(name);
                        let schema = AttributeSchema {
                            constraint: Self::for_type(attr_ty),
                            is_required: !is_optional,
                            is_optional,
                            ..AttributeSchema::default()
                        };
                        (name.clone(), schema)
                    })
                    .collect(),
                name: None,
            }),
        }
    }
}
