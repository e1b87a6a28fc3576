//! # Shared Composition Steps
//!
//! Every merger runs the same skeleton: copy the baseline, resolve each
//! referenced plugin once, then register shapes as dependent bodies under
//! keys derived from the local references. The pieces live here.

use std::collections::{BTreeMap, BTreeSet};

use tfschema_core::{
    Address, AttributeSchema, BlockSchema, BodySchema, Constraint, DependencyKeys,
    ExpressionValue, MarkupContent, NestingMode, ObjectConstraint, PluginAddr, PluginRef,
    PluginSchema, SchemaKey, ScopeId, Targetable, Type, sort_targetables,
};

use tfschema_versions::semver::Version;
use tfschema_versions::BUILTIN_PLUGIN;

use crate::error::MergeError;
use crate::meta::UnitMeta;
use crate::reader::StateReader;

/// One plugin, resolved once, with every local reference pointing at it.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedPlugin {
    pub addr: PluginAddr,
    pub schema: PluginSchema,
    pub refs: Vec<PluginRef>,
}

impl ResolvedPlugin {
    /// Distinct local names, in order.
    pub fn local_names(&self) -> BTreeSet<&str> {
        self.refs.iter().map(|r| r.local_name.as_str()).collect()
    }
}

/// The built-in plugin of `version`, if the unit references it.
///
/// A version the built-in table does not cover is logged and yields
/// `None`, so the built-in references are skipped like any other
/// unavailable plugin.
pub(crate) fn builtin_schema(meta: &UnitMeta, version: &Version) -> Option<&'static PluginSchema> {
    if !meta.plugin_references.values().any(PluginAddr::is_builtin) {
        return None;
    }
    match BUILTIN_PLUGIN.get(version) {
        Ok(schema) => Some(schema),
        Err(e) => {
            tracing::warn!(%version, error = %e, "built-in plugin unavailable, skipping");
            None
        }
    }
}

/// Group the unit's references by plugin and resolve each plugin once.
///
/// Built-in plugins are served from `builtin` instead of the reader; with
/// no built-in schema they are skipped. Reader failures are logged and the
/// plugin is left out.
pub(crate) fn resolve_plugins<R: StateReader + ?Sized>(
    reader: &R,
    meta: &UnitMeta,
    builtin: Option<&PluginSchema>,
) -> Vec<ResolvedPlugin> {
    let mut grouped: BTreeMap<&PluginAddr, Vec<PluginRef>> = BTreeMap::new();
    for (reference, addr) in &meta.plugin_references {
        grouped.entry(addr).or_default().push(reference.clone());
    }

    let mut resolved = Vec::with_capacity(grouped.len());
    for (addr, refs) in grouped {
        let schema = if addr.is_builtin() {
            match builtin {
                Some(schema) => schema.clone(),
                None => {
                    tracing::debug!(plugin = %addr, "built-in plugin not offered here");
                    continue;
                }
            }
        } else {
            let constraint = meta.plugin_requirements.get(addr);
            match reader.plugin_schema(&meta.path.path, addr, constraint) {
                Ok(schema) => schema,
                Err(e) => {
                    tracing::warn!(plugin = %addr, unit = %meta.path.path, error = %e, "skipping plugin");
                    continue;
                }
            }
        };
        resolved.push(ResolvedPlugin {
            addr: addr.clone(),
            schema,
            refs,
        });
    }
    resolved
}

/// `{label0 = value}`.
pub(crate) fn label_key(value: &str) -> Result<SchemaKey, MergeError> {
    Ok(SchemaKey::new(&DependencyKeys::default().with_label(0, value))?)
}

/// `{label0 = name, attr source == "<source>"}`.
pub(crate) fn source_key(name: &str, source: &str) -> Result<SchemaKey, MergeError> {
    let keys = DependencyKeys::default()
        .with_label(0, name)
        .with_attribute("source", ExpressionValue::static_string(source));
    Ok(SchemaKey::new(&keys)?)
}

/// Keys associating a resource-like shape with a plugin reference.
///
/// Always the explicit `provider = <ref>` key; also the implicit key when
/// the reference's local name owns the type name, whatever its alias.
/// `base` carries extra conditions shared by both.
pub(crate) fn association_keys(
    reference: &PluginRef,
    type_name: &str,
    base: &DependencyKeys,
) -> Result<Vec<SchemaKey>, MergeError> {
    let typed = base.clone().with_label(0, type_name);
    let explicit = typed
        .clone()
        .with_attribute("provider", ExpressionValue::Address(reference.address()));

    let mut keys = vec![SchemaKey::new(&explicit)?];
    if reference.owns_type_name(type_name) {
        keys.push(SchemaKey::new(&typed)?);
    }
    Ok(keys)
}

/// Insert a dependent body on a host block.
pub(crate) fn register(host: &mut BlockSchema, host_name: &str, key: SchemaKey, body: BodySchema) {
    tracing::debug!(host = host_name, key = %key, "registered dependent body");
    host.dependent_body.insert(key, body);
}

/// Register every resource-like shape of `shapes` on `host` under the
/// association keys of `reference`.
pub(crate) fn register_shapes(
    host: &mut BlockSchema,
    host_name: &str,
    reference: &PluginRef,
    shapes: &BTreeMap<String, BodySchema>,
) -> Result<(), MergeError> {
    let base = DependencyKeys::default();
    for (type_name, body) in shapes {
        for key in association_keys(reference, type_name, &base)? {
            register(host, host_name, key, body.clone());
        }
    }
    Ok(())
}

// ─── Types of converted shapes ──────────────────────────────────────────

/// The value type a constraint accepts.
///
/// Alternatives that disagree collapse to `dynamic`.
pub(crate) fn constraint_type(constraint: &Constraint) -> Type {
    match constraint {
        Constraint::AnyExpression(ty) | Constraint::LiteralType(ty) => ty.clone(),
        Constraint::LiteralValue(value) => Type::of_value(value),
        Constraint::Reference { of_type, .. } => of_type.clone().unwrap_or(Type::Dynamic),
        Constraint::TypeDeclaration | Constraint::Keyword(_) => Type::Dynamic,
        Constraint::List { elem, .. } => Type::list(constraint_type(elem)),
        Constraint::Set { elem, .. } => Type::set(constraint_type(elem)),
        Constraint::Map { elem } => Type::map(constraint_type(elem)),
        Constraint::Tuple(elems) => Type::Tuple(elems.iter().map(constraint_type).collect()),
        Constraint::Object(object) => Type::Object {
            attributes: object
                .attributes
                .iter()
                .map(|(name, attr)| (name.clone(), constraint_type(&attr.constraint)))
                .collect(),
            optional: object
                .attributes
                .iter()
                .filter(|(_, attr)| !attr.is_required)
                .map(|(name, _)| name.clone())
                .collect(),
        },
        Constraint::OneOf(alternatives) => {
            let types: Vec<Type> = alternatives.iter().map(constraint_type).collect();
            match types.split_first() {
                Some((first, rest)) if rest.iter().all(|ty| ty == first) => first.clone(),
                _ => Type::Dynamic,
            }
        }
    }
}

/// The object type of a body: attributes plus nested blocks.
pub(crate) fn body_type(body: &BodySchema) -> Type {
    let mut attributes = BTreeMap::new();
    let mut optional = BTreeSet::new();
    for (name, attr) in &body.attributes {
        attributes.insert(name.clone(), constraint_type(&attr.constraint));
        if !attr.is_required {
            optional.insert(name.clone());
        }
    }
    for (name, block) in &body.blocks {
        attributes.insert(name.clone(), block_type(block));
        if block.min_items == 0 {
            optional.insert(name.clone());
        }
    }
    Type::Object { attributes, optional }
}

fn block_type(block: &BlockSchema) -> Type {
    let object = body_type(&block.body);
    match block.nesting {
        NestingMode::Single => object,
        NestingMode::List => Type::list(object),
        NestingMode::Set => Type::set(object),
        NestingMode::Map => Type::map(object),
    }
}

/// An object constraint mirroring a body, with every field optional.
///
/// Used where a shape is written out as a value (`defaults`, `attrs`)
/// rather than as a body.
pub(crate) fn optional_object(body: &BodySchema, name: Option<String>) -> Constraint {
    let mut attributes = BTreeMap::new();
    for (field, attr) in &body.attributes {
        attributes.insert(
            field.clone(),
            AttributeSchema {
                is_required: false,
                is_optional: true,
                ..attr.clone()
            },
        );
    }
    for (field, block) in &body.blocks {
        let object = optional_object(&block.body, None);
        let constraint = match block.nesting {
            NestingMode::Single => object,
            NestingMode::List => Constraint::List {
                elem: Box::new(object),
                min_items: 0,
                max_items: block.max_items,
            },
            NestingMode::Set => Constraint::Set {
                elem: Box::new(object),
                min_items: 0,
                max_items: block.max_items,
            },
            NestingMode::Map => Constraint::Map { elem: Box::new(object) },
        };
        attributes.insert(
            field.clone(),
            AttributeSchema {
                description: block.description.clone(),
                is_optional: true,
                constraint,
                ..AttributeSchema::default()
            },
        );
    }
    Constraint::Object(ObjectConstraint { attributes, name })
}

/// The `attrs` target of a policed shape, with one nested target per field.
pub(crate) fn attrs_targetable(body: &BodySchema) -> Targetable {
    let root = Address::root("attrs");
    let scope = ScopeId::new(ScopeId::ATTRS);

    let mut nested: Vec<Targetable> = body
        .attributes
        .iter()
        .map(|(name, attr)| Targetable {
            is_sensitive: attr.is_sensitive,
            description: attr.description.clone(),
            ..Targetable::new(root.clone().attr(name.clone()), scope.clone(), constraint_type(&attr.constraint))
        })
        .collect();
    nested.extend(body.blocks.iter().map(|(name, block)| Targetable {
        description: block.description.clone(),
        ..Targetable::new(root.clone().attr(name.clone()), scope.clone(), block_type(block))
    }));

    let mut target = Targetable::new(root, scope, body_type(body));
    target.description = MarkupContent::plain_text("Attributes of the policed object");
    target.nested_targetables = nested;
    sort_targetables(std::slice::from_mut(&mut target));
    target
}
