//! Callable function signatures, built-in or contributed by plugins.

use serde::Serialize;

use crate::types::Type;

/// One parameter of a function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Accepted type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Whether `null` is accepted.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub allow_null: bool,
}

impl FunctionParameter {
    /// A non-nullable parameter without description.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            ..Self::default()
        }
    }
}

/// Signature of a callable function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    /// Description of the function.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Short detail, e.g. the contributing plugin.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
    /// Type of the result.
    pub return_type: Type,
    /// Positional parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<FunctionParameter>,
    /// Trailing variadic parameter, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var_param: Option<FunctionParameter>,
}

impl FunctionSignature {
    /// A signature with the given parameters and return type.
    pub fn new(description: impl Into<String>, params: Vec<FunctionParameter>, return_type: Type) -> Self {
        Self {
            description: description.into(),
            return_type,
            params,
            ..Self::default()
        }
    }

    /// Add a variadic parameter.
    pub fn variadic(mut self, param: FunctionParameter) -> Self {
        self.var_param = Some(param);
        self
    }
}
