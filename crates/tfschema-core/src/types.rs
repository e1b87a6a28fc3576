//! # Type System
//!
//! The configuration language's value types. A `Type` is what a variable
//! declares, what an attribute accepts and what a reference target resolves
//! to.
//!
//! ## Wire Encoding
//!
//! Plugin schema documents encode types as JSON:
//!
//! ```text
//! "string" | "number" | "bool" | "dynamic"
//! ["list", T] | ["set", T] | ["map", T]
//! ["tuple", [T, ...]]
//! ["object", {"name": T, ...}]                 required attributes only
//! ["object", {"name": T, ...}, ["name", ...]]  with optional attributes
//! ```
//!
//! `Serialize`/`Deserialize` go through this encoding, so a `Type` embedded
//! in any serde document round-trips with the plugin wire format.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::TypeError;

/// A value type of the configuration language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Unicode string.
    String,
    /// Arbitrary-precision number.
    Number,
    /// Boolean.
    Bool,
    /// Any type; the type is only known once a value exists.
    Dynamic,
    /// Ordered sequence of one element type.
    List(Box<Type>),
    /// Unordered, de-duplicated collection of one element type.
    Set(Box<Type>),
    /// String-keyed collection of one element type.
    Map(Box<Type>),
    /// Fixed-length sequence with a type per position.
    Tuple(Vec<Type>),
    /// Fixed set of named attributes, some of which may be optional.
    Object {
        /// Attribute name to attribute type.
        attributes: BTreeMap<String, Type>,
        /// Names of attributes that may be omitted.
        optional: BTreeSet<String>,
    },
}

impl Type {
    /// `list(elem)`.
    pub fn list(elem: Type) -> Self {
        Self::List(Box::new(elem))
    }

    /// `set(elem)`.
    pub fn set(elem: Type) -> Self {
        Self::Set(Box::new(elem))
    }

    /// `map(elem)`.
    pub fn map(elem: Type) -> Self {
        Self::Map(Box::new(elem))
    }

    /// An object type with only required attributes.
    pub fn object<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        Self::Object {
            attributes: attributes.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            optional: BTreeSet::new(),
        }
    }

    /// The empty object type.
    pub fn empty_object() -> Self {
        Self::object(Vec::<(String, Type)>::new())
    }

    /// Returns true for `string`, `number` and `bool`.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::String | Self::Number | Self::Bool)
    }

    /// Returns true for object types.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object { .. })
    }

    /// Element type of a list, set or map.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Self::List(elem) | Self::Set(elem) | Self::Map(elem) => Some(elem),
            _ => None,
        }
    }

    /// Infer the type of a static literal value.
    ///
    /// Follows literal-expression semantics: `[..]` is a tuple, `{..}` is an
    /// object, `null` carries no type information and is `dynamic`.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Dynamic,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(items) => Self::Tuple(items.iter().map(Self::of_value).collect()),
            Value::Object(map) => Self::Object {
                attributes: map
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::of_value(v)))
                    .collect(),
                optional: BTreeSet::new(),
            },
        }
    }

    /// Decode the JSON wire encoding of a type.
    ///
    /// # Errors
    ///
    /// Returns `TypeError` when the encoding names an unknown type or is
    /// structurally malformed.
    pub fn from_json(value: &Value) -> Result<Self, TypeError> {
        match value {
            Value::String(name) => match name.as_str() {
                "string" => Ok(Self::String),
                "number" => Ok(Self::Number),
                "bool" => Ok(Self::Bool),
                "dynamic" => Ok(Self::Dynamic),
                other => Err(TypeError::UnknownPrimitive(other.to_string())),
            },
            Value::Array(parts) => {
                let kind = parts
                    .first()
                    .and_then(Value::as_str)
                    .ok_or_else(|| TypeError::Malformed(value.to_string()))?;
                match (kind, parts.len()) {
                    ("list", 2) => Ok(Self::list(Self::from_json(&parts[1])?)),
                    ("set", 2) => Ok(Self::set(Self::from_json(&parts[1])?)),
                    ("map", 2) => Ok(Self::map(Self::from_json(&parts[1])?)),
                    ("tuple", 2) => {
                        let elems = parts[1]
                            .as_array()
                            .ok_or_else(|| TypeError::Malformed(value.to_string()))?;
                        let elems: Result<Vec<_>, _> = elems.iter().map(Self::from_json).collect();
                        Ok(Self::Tuple(elems?))
                    }
                    ("object", 2 | 3) => {
                        let attrs = parts[1]
                            .as_object()
                            .ok_or_else(|| TypeError::Malformed(value.to_string()))?;
                        let mut attributes = BTreeMap::new();
                        for (name, ty) in attrs {
                            attributes.insert(name.clone(), Self::from_json(ty)?);
                        }
                        let mut optional = BTreeSet::new();
                        if let Some(names) = parts.get(2) {
                            let names = names
                                .as_array()
                                .ok_or_else(|| TypeError::Malformed(value.to_string()))?;
                            for name in names {
                                let name = name
                                    .as_str()
                                    .ok_or_else(|| TypeError::Malformed(value.to_string()))?;
                                optional.insert(name.to_string());
                            }
                        }
                        Ok(Self::Object { attributes, optional })
                    }
                    ("list" | "set" | "map" | "tuple" | "object", _) => {
                        Err(TypeError::Malformed(value.to_string()))
                    }
                    (other, _) => Err(TypeError::UnknownKind(other.to_string())),
                }
            }
            _ => Err(TypeError::Malformed(value.to_string())),
        }
    }

    /// Encode this type in the JSON wire encoding.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String => Value::from("string"),
            Self::Number => Value::from("number"),
            Self::Bool => Value::from("bool"),
            Self::Dynamic => Value::from("dynamic"),
            Self::List(elem) => Value::Array(vec!["list".into(), elem.to_json()]),
            Self::Set(elem) => Value::Array(vec!["set".into(), elem.to_json()]),
            Self::Map(elem) => Value::Array(vec!["map".into(), elem.to_json()]),
            Self::Tuple(elems) => Value::Array(vec![
                "tuple".into(),
                Value::Array(elems.iter().map(Type::to_json).collect()),
            ]),
            Self::Object { attributes, optional } => {
                let attrs: serde_json::Map<String, Value> = attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                let mut parts = vec!["object".into(), Value::Object(attrs)];
                if !optional.is_empty() {
                    parts.push(Value::Array(optional.iter().map(|n| Value::from(n.as_str())).collect()));
                }
                Value::Array(parts)
            }
        }
    }
}

impl Default for Type {
    fn default() -> Self {
        Self::Dynamic
    }
}

/// Renders the type in type-constraint syntax, e.g. `list(object({id=string}))`.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Bool => write!(f, "bool"),
            Self::Dynamic => write!(f, "any"),
            Self::List(elem) => write!(f, "list({elem})"),
            Self::Set(elem) => write!(f, "set({elem})"),
            Self::Map(elem) => write!(f, "map({elem})"),
            Self::Tuple(elems) => {
                write!(f, "tuple([")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, "])")
            }
            Self::Object { attributes, optional } => {
                write!(f, "object({{")?;
                for (i, (name, ty)) in attributes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if optional.contains(name) {
                        write!(f, "{name}=optional({ty})")?;
                    } else {
                        write!(f, "{name}={ty}")?;
                    }
                }
                write!(f, "}})")
            }
        }
    }
}

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Type::from_json(&value).map_err(serde::de::Error::custom)
    }
}
