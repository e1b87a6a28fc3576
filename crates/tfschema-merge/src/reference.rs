//! # Reference Targets of a Child Unit
//!
//! A module call or stack component exposes its child unit in two
//! directions:
//!
//! - **inbound**: the child's variables become the caller's input
//!   attributes, each linked back to `var.<name>` in the child;
//! - **outbound**: the child's outputs become addressable as
//!   `module.<name>.<output>` (or `component.<name>.<output>`), with nested
//!   targets for every element of a statically known structured value.
//!
//! Nested targets are sorted by address, step-wise, so `x[2]` precedes
//! `x[10]`.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tfschema_core::{
    sort_targetables, Address, AttributeSchema, BodySchema, Constraint, IndexKey, MarkupContent,
    PathTarget, ScopeId, SourceRange, Target, Targetable, Type,
};

use crate::meta::{Output, UnitMeta, Variable};

/// Everything a calling block gains from one child unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTargets {
    /// One input attribute per child variable.
    pub attributes: BTreeMap<String, AttributeSchema>,
    /// The child's namespace, typed as the object of its outputs.
    pub targetable: Targetable,
    /// Where to navigate for the child unit, when its files are known.
    pub target: Option<Target>,
}

impl ReferenceTargets {
    /// The dependent body of a calling block whose arguments are the
    /// child's variables (module calls).
    pub fn into_body(self) -> BodySchema {
        BodySchema {
            attributes: self.attributes,
            targets: self.target,
            targetable_as: vec![self.targetable],
            ..BodySchema::default()
        }
    }
}

/// Builds [`ReferenceTargets`] for one child unit.
#[derive(Debug, Clone)]
pub struct ReferenceTargetBuilder<'a> {
    meta: &'a UnitMeta,
    namespace: Address,
    scope: ScopeId,
}

impl<'a> ReferenceTargetBuilder<'a> {
    /// Targets of the child `meta` exposed under `namespace`
    /// (e.g. `module.net`) in `scope`.
    pub fn new(meta: &'a UnitMeta, namespace: Address, scope: ScopeId) -> Self {
        Self {
            meta,
            namespace,
            scope,
        }
    }

    /// Targets of a module call.
    pub fn module_call(meta: &'a UnitMeta, name: &str) -> Self {
        Self::new(
            meta,
            Address::root("module").attr(name),
            ScopeId::new(ScopeId::MODULE),
        )
    }

    /// Targets of a stack component.
    pub fn component(meta: &'a UnitMeta, name: &str) -> Self {
        Self::new(
            meta,
            Address::root("component").attr(name),
            ScopeId::new(ScopeId::COMPONENT),
        )
    }

    /// Build the inbound attributes, the outbound target tree and the
    /// navigation target.
    pub fn build(&self) -> ReferenceTargets {
        let outputs: Vec<(&String, Targetable)> = self
            .meta
            .outputs
            .iter()
            .map(|(name, output)| (name, self.output_targetable(name, output)))
            .collect();
        let as_type = Type::Object {
            attributes: outputs
                .iter()
                .map(|(name, target)| ((*name).clone(), target.as_type.clone()))
                .collect(),
            optional: BTreeSet::new(),
        };

        let mut targetable = Targetable::new(self.namespace.clone(), self.scope.clone(), as_type);
        targetable.nested_targetables = outputs.into_iter().map(|(_, target)| target).collect();
        sort_targetables(&mut targetable.nested_targetables);

        let target = self.meta.filenames.first().map(|filename| Target {
            path: self.meta.path.clone(),
            range: SourceRange::file_start(filename.clone()),
        });

        ReferenceTargets {
            attributes: self.input_attributes(),
            targetable,
            target,
        }
    }

    /// Input attributes only, for callers that wrap them (stack `inputs`).
    pub fn input_attributes(&self) -> BTreeMap<String, AttributeSchema> {
        self.meta
            .variables
            .iter()
            .map(|(name, var)| (name.clone(), self.variable_attribute(name, var)))
            .collect()
    }

    fn variable_attribute(&self, name: &str, var: &Variable) -> AttributeSchema {
        let ty = var.effective_type();
        let is_required = var.is_required();
        AttributeSchema {
            description: MarkupContent::plain_text(var.description.clone()),
            is_required,
            is_optional: !is_required,
            is_sensitive: var.is_sensitive,
            constraint: Constraint::for_type(&ty),
            origin_for_target: Some(PathTarget {
                address: Address::root("var").attr(name),
                path: self.meta.path.clone(),
                range: var.range.clone(),
                scope_id: ScopeId::new(ScopeId::VARIABLE),
                as_type: ty,
            }),
            ..AttributeSchema::default()
        }
    }

    fn output_targetable(&self, name: &str, output: &Output) -> Targetable {
        let address = self.namespace.clone().attr(name);
        let mut target = match &output.value {
            Some(value) if !value.is_null() => {
                value_targetable(address, self.scope.clone(), value, output.is_sensitive)
            }
            _ => Targetable::new(
                address,
                self.scope.clone(),
                output.ty.clone().unwrap_or(Type::Dynamic),
            ),
        };
        target.is_sensitive = output.is_sensitive;
        target.description = MarkupContent::plain_text(output.description.clone());
        target
    }
}

/// A target for a static value, nesting one target per element.
fn value_targetable(address: Address, scope: ScopeId, value: &Value, is_sensitive: bool) -> Targetable {
    let nested = match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let step = address.clone().index(IndexKey::Number(i as u64));
                value_targetable(step, scope.clone(), item, is_sensitive)
            })
            .collect(),
        Value::Object(fields) => fields
            .iter()
            .map(|(key, item)| {
                let step = address.clone().attr(key.clone());
                value_targetable(step, scope.clone(), item, is_sensitive)
            })
            .collect(),
        _ => Vec::new(),
    };
    Targetable {
        is_sensitive,
        nested_targetables: nested,
        ..Targetable::new(address, scope, Type::of_value(value))
    }
}
