//! # Reference Targets
//!
//! A `Targetable` is an address that expressions elsewhere may reference,
//! together with the type found there. Structured values carry nested
//! targetables so that `module.net.subnets[0].id` resolves to the right leaf
//! type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::markup::MarkupContent;
use crate::types::Type;

/// Identifier of a reference scope (`module`, `variable`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    /// Outputs of a called module.
    pub const MODULE: &'static str = "module";
    /// Outputs of a stack component.
    pub const COMPONENT: &'static str = "component";
    /// Input variables.
    pub const VARIABLE: &'static str = "variable";
    /// Plugin configurations.
    pub const PROVIDER: &'static str = "provider";
    /// Attributes of the policed object.
    pub const ATTRS: &'static str = "attrs";

    /// Construct a scope identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An addressable, typed location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Targetable {
    /// Address of the target.
    pub address: Address,
    /// Scope the target belongs to.
    pub scope_id: ScopeId,
    /// Type of the value at the address.
    pub as_type: Type,
    /// Whether the value is sensitive.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_sensitive: bool,
    /// Description of the value.
    #[serde(skip_serializing_if = "MarkupContent::is_empty")]
    pub description: MarkupContent,
    /// Targets nested inside structured values, sorted by address.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested_targetables: Vec<Targetable>,
}

impl Targetable {
    /// A target with no description and no nested targets.
    pub fn new(address: Address, scope_id: ScopeId, as_type: Type) -> Self {
        Self {
            address,
            scope_id,
            as_type,
            is_sensitive: false,
            description: MarkupContent::default(),
            nested_targetables: Vec::new(),
        }
    }

    /// Find the target at `address` in this tree, including `self`.
    pub fn find(&self, address: &Address) -> Option<&Targetable> {
        if &self.address == address {
            return Some(self);
        }
        self.nested_targetables.iter().find_map(|t| t.find(address))
    }
}

/// Sort targets by address, recursively.
pub fn sort_targetables(targets: &mut [Targetable]) {
    targets.sort_by(|a, b| a.address.cmp(&b.address));
    for target in targets.iter_mut() {
        sort_targetables(&mut target.nested_targetables);
    }
}
