//! # Wire Schema Conversion
//!
//! Depth-first conversion of wire-format plugin schemas into the internal
//! schema tree.
//!
//! - A plain-typed attribute becomes `OneOf[literal of T, reference to T]`
//!   via [`Constraint::for_type`].
//! - A nested-type attribute becomes an object constraint built from the
//!   nested attributes' own flags, wrapped in list/set/map per its nesting
//!   mode. Single and group nesting are the bare object.
//! - Nested block types stay block-shaped.
//! - An attribute whose type is a list or set of objects is also exposed as
//!   a synthesized block of the same name. Blocks declared by the plugin are
//!   applied afterwards, so an explicit block always wins.

use std::collections::BTreeMap;

use tfschema_core::{
    AttributeSchema, BlockSchema, BodySchema, Constraint, FunctionParameter, FunctionSignature,
    MarkupContent, NestingMode, ObjectConstraint, PluginAddr, PluginSchema, Type,
};

use crate::error::ConvertError;
use crate::wire::{
    DescriptionKind, ProviderSchemasDocument, WireAttribute, WireBlock, WireFunction,
    WireNestedBlock, WireNestedType, WireNesting, WireParameter, WirePluginSchema, WireSchema,
};

/// Decode a multi-plugin document and convert every plugin in it.
///
/// Each plugin is annotated with its address (see [`PluginSchema::annotate`]).
///
/// # Errors
///
/// Returns `ConvertError` if the document cannot be decoded, a key is not a
/// valid plugin address, or any plugin fails to convert.
pub fn parse_provider_schemas(json: &[u8]) -> Result<BTreeMap<PluginAddr, PluginSchema>, ConvertError> {
    let document: ProviderSchemasDocument = serde_json::from_slice(json)?;
    tracing::debug!(
        format_version = %document.format_version,
        plugins = document.provider_schemas.len(),
        "decoded plugin schema document"
    );

    let mut plugins = BTreeMap::new();
    for (key, wire) in &document.provider_schemas {
        let addr = PluginAddr::parse(key)?;
        let mut schema = convert_plugin_schema(wire)?;
        schema.annotate(&addr);
        plugins.insert(addr, schema);
    }
    Ok(plugins)
}

/// Decode and convert a single-plugin document.
///
/// # Errors
///
/// Returns `ConvertError` if the document cannot be decoded or converted.
pub fn parse_plugin_schema(json: &[u8]) -> Result<PluginSchema, ConvertError> {
    let wire: WirePluginSchema = serde_json::from_slice(json)?;
    convert_plugin_schema(&wire)
}

/// Convert one plugin's wire schema.
///
/// # Errors
///
/// Returns `ConvertError` for malformed attributes, inconsistent nesting or
/// undecodable type expressions.
pub fn convert_plugin_schema(wire: &WirePluginSchema) -> Result<PluginSchema, ConvertError> {
    let provider = wire
        .provider
        .as_ref()
        .map(|p| body_from_block(&p.block, "provider"))
        .transpose()?;

    let shapes = |kind: &str, schemas: &BTreeMap<String, WireSchema>| {
        schemas
            .iter()
            .map(|(name, schema)| {
                let body = body_from_block(&schema.block, &format!("{kind} {name}"))?;
                Ok((name.clone(), body))
            })
            .collect::<Result<BTreeMap<_, _>, ConvertError>>()
    };

    let functions = wire
        .functions
        .iter()
        .map(|(name, f)| Ok((name.clone(), convert_function(f, name)?)))
        .collect::<Result<BTreeMap<_, _>, ConvertError>>()?;

    let schema = PluginSchema {
        provider,
        resources: shapes("resource", &wire.resource_schemas)?,
        data_sources: shapes("data", &wire.data_source_schemas)?,
        ephemeral_resources: shapes("ephemeral", &wire.ephemeral_resource_schemas)?,
        functions,
    };
    tracing::debug!(
        resources = schema.resources.len(),
        data_sources = schema.data_sources.len(),
        ephemeral_resources = schema.ephemeral_resources.len(),
        functions = schema.functions.len(),
        "converted plugin schema"
    );
    Ok(schema)
}

/// Convert a wire block into a body schema.
///
/// `path` prefixes error messages.
///
/// # Errors
///
/// Returns `ConvertError` for the first malformed element found.
pub fn body_from_block(block: &WireBlock, path: &str) -> Result<BodySchema, ConvertError> {
    let mut body = BodySchema {
        description: markup(&block.description, block.description_kind),
        is_deprecated: block.deprecated,
        ..BodySchema::default()
    };

    for (name, attr) in &block.attributes {
        let attr_path = format!("{path} > {name}");
        let schema = convert_attribute(attr, &attr_path)?;
        if let Some(synthesized) = synthesize_block(attr, &schema, &attr_path)? {
            body.blocks.insert(name.clone(), synthesized);
        }
        body.attributes.insert(name.clone(), schema);
    }

    // Explicit blocks last: they replace synthesized ones of the same name.
    for (name, nested) in &block.block_types {
        let schema = convert_nested_block(nested, &format!("{path} > {name}"))?;
        body.blocks.insert(name.clone(), schema);
    }

    Ok(body)
}

fn convert_attribute(attr: &WireAttribute, path: &str) -> Result<AttributeSchema, ConvertError> {
    let constraint = match (&attr.ty, &attr.nested_type) {
        (Some(ty), None) => Constraint::for_type(&decode_type(ty, path)?),
        (None, Some(nested)) => nested_constraint(nested, path)?,
        (None, None) => {
            return Err(ConvertError::InvalidAttribute {
                path: path.to_string(),
                reason: "neither type nor nested_type is set",
            })
        }
        (Some(_), Some(_)) => {
            return Err(ConvertError::InvalidAttribute {
                path: path.to_string(),
                reason: "both type and nested_type are set",
            })
        }
    };

    Ok(AttributeSchema {
        description: markup(&attr.description, attr.description_kind),
        is_required: attr.required,
        is_optional: attr.optional,
        is_computed: attr.computed,
        is_sensitive: attr.sensitive,
        is_deprecated: attr.deprecated,
        constraint,
        ..AttributeSchema::default()
    })
}

fn nested_attributes(
    attributes: &BTreeMap<String, WireAttribute>,
    path: &str,
) -> Result<BTreeMap<String, AttributeSchema>, ConvertError> {
    attributes
        .iter()
        .map(|(name, attr)| Ok((name.clone(), convert_attribute(attr, &format!("{path} > {name}"))?)))
        .collect()
}

fn nested_constraint(nested: &WireNestedType, path: &str) -> Result<Constraint, ConvertError> {
    check_bounds(nested.nesting_mode, nested.min_items, nested.max_items, path)?;
    let object = Constraint::Object(ObjectConstraint {
        attributes: nested_attributes(&nested.attributes, path)?,
        name: None,
    });
    Ok(match nested.nesting_mode {
        WireNesting::Single | WireNesting::Group => object,
        WireNesting::List => Constraint::List {
            elem: Box::new(object),
            min_items: nested.min_items,
            max_items: nested.max_items,
        },
        WireNesting::Set => Constraint::Set {
            elem: Box::new(object),
            min_items: nested.min_items,
            max_items: nested.max_items,
        },
        WireNesting::Map => Constraint::Map {
            elem: Box::new(object),
        },
    })
}

fn convert_nested_block(nested: &WireNestedBlock, path: &str) -> Result<BlockSchema, ConvertError> {
    check_bounds(nested.nesting_mode, nested.min_items, nested.max_items, path)?;
    let body = body_from_block(&nested.block, path)?;
    Ok(BlockSchema {
        nesting: nesting_mode(nested.nesting_mode),
        description: body.description.clone(),
        is_deprecated: nested.block.deprecated,
        min_items: nested.min_items,
        max_items: nested.max_items,
        body,
        ..BlockSchema::default()
    })
}

/// The block form of a list-of-object or set-of-object attribute.
fn synthesize_block(
    attr: &WireAttribute,
    converted: &AttributeSchema,
    path: &str,
) -> Result<Option<BlockSchema>, ConvertError> {
    let (nesting, attributes, min_items, max_items) = match (&attr.ty, &attr.nested_type) {
        (Some(ty), None) => match decode_type(ty, path)? {
            Type::List(elem) => match object_fields(&elem) {
                Some(fields) => (NestingMode::List, fields, 0, 0),
                None => return Ok(None),
            },
            Type::Set(elem) => match object_fields(&elem) {
                Some(fields) => (NestingMode::Set, fields, 0, 0),
                None => return Ok(None),
            },
            _ => return Ok(None),
        },
        (None, Some(nested)) => {
            let nesting = match nested.nesting_mode {
                WireNesting::List => NestingMode::List,
                WireNesting::Set => NestingMode::Set,
                WireNesting::Single | WireNesting::Group | WireNesting::Map => return Ok(None),
            };
            (
                nesting,
                nested_attributes(&nested.attributes, path)?,
                nested.min_items,
                nested.max_items,
            )
        }
        _ => return Ok(None),
    };

    Ok(Some(BlockSchema {
        nesting,
        body: BodySchema {
            attributes,
            description: converted.description.clone(),
            ..BodySchema::default()
        },
        description: converted.description.clone(),
        is_deprecated: converted.is_deprecated,
        min_items,
        max_items,
        ..BlockSchema::default()
    }))
}

/// Attribute schemas of an object type's fields.
fn object_fields(ty: &Type) -> Option<BTreeMap<String, AttributeSchema>> {
    let Type::Object { attributes, optional } = ty else {
        return None;
    };
    Some(
        attributes
            .iter()
            .map(|(name, field)| {
                let is_optional = optional.contains(name);
                let schema = AttributeSchema {
                    is_required: !is_optional,
                    is_optional,
                    constraint: Constraint::for_type(field),
                    ..AttributeSchema::default()
                };
                (name.clone(), schema)
            })
            .collect(),
    )
}

fn check_bounds(mode: WireNesting, min_items: u64, max_items: u64, path: &str) -> Result<(), ConvertError> {
    let inconsistent = |reason: String| ConvertError::InconsistentNesting {
        path: path.to_string(),
        reason,
    };
    if matches!(mode, WireNesting::Single | WireNesting::Group) && max_items > 1 {
        return Err(inconsistent(format!("single nesting with max_items {max_items}")));
    }
    if max_items > 0 && min_items > max_items {
        return Err(inconsistent(format!(
            "min_items {min_items} exceeds max_items {max_items}"
        )));
    }
    Ok(())
}

fn nesting_mode(mode: WireNesting) -> NestingMode {
    match mode {
        WireNesting::Single | WireNesting::Group => NestingMode::Single,
        WireNesting::List => NestingMode::List,
        WireNesting::Set => NestingMode::Set,
        WireNesting::Map => NestingMode::Map,
    }
}

fn decode_type(value: &serde_json::Value, path: &str) -> Result<Type, ConvertError> {
    Type::from_json(value).map_err(|source| ConvertError::InvalidType {
        path: path.to_string(),
        source,
    })
}

fn markup(text: &str, kind: DescriptionKind) -> MarkupContent {
    match kind {
        DescriptionKind::Plain => MarkupContent::plain_text(text),
        DescriptionKind::Markdown => MarkupContent::markdown(text),
    }
}

/// Convert a function signature. The description falls back to the summary.
///
/// # Errors
///
/// Returns `ConvertError::InvalidType` for undecodable parameter or return
/// types.
pub fn convert_function(f: &WireFunction, name: &str) -> Result<FunctionSignature, ConvertError> {
    let path = format!("function {name}");
    let description = if f.description.is_empty() {
        &f.summary
    } else {
        &f.description
    };
    let params = f
        .parameters
        .iter()
        .map(|p| convert_parameter(p, &path))
        .collect::<Result<Vec<_>, _>>()?;
    let var_param = f
        .variadic_parameter
        .as_ref()
        .map(|p| convert_parameter(p, &path))
        .transpose()?;

    Ok(FunctionSignature {
        description: description.clone(),
        detail: String::new(),
        return_type: decode_type(&f.return_type, &path)?,
        params,
        var_param,
    })
}

fn convert_parameter(p: &WireParameter, path: &str) -> Result<FunctionParameter, ConvertError> {
    Ok(FunctionParameter {
        name: p.name.clone(),
        description: p.description.clone(),
        ty: decode_type(&p.ty, &format!("{path} > {}", p.name))?,
        allow_null: p.is_nullable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(value: serde_json::Value) -> WireBlock {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn plain_attribute_is_two_way() {
        let body = body_from_block(
            &block(json!({"attributes": {"name": {"type": "string", "required": true}}})),
            "test",
        )
        .unwrap();
        let name = &body.attributes["name"];
        assert!(name.is_required);
        assert_eq!(name.constraint, Constraint::for_type(&Type::String));
    }

    #[test]
    fn nested_type_wraps_object() {
        let body = body_from_block(
            &block(json!({"attributes": {"rule": {
                "nested_type": {
                    "nesting_mode": "map",
                    "attributes": {"port": {"type": "number", "required": true}}
                },
                "optional": true
            }}})),
            "test",
        )
        .unwrap();
        let Constraint::Map { elem } = &body.attributes["rule"].constraint else {
            panic!("expected map constraint");
        };
        let Constraint::Object(obj) = elem.as_ref() else {
            panic!("expected object element");
        };
        assert!(obj.attributes["port"].is_required);
        // Map nesting is not block-compatible.
        assert!(!body.blocks.contains_key("rule"));
    }

    #[test]
    fn single_nesting_is_bare_object() {
        let body = body_from_block(
            &block(json!({"attributes": {"timeouts": {
                "nested_type": {
                    "nesting_mode": "single",
                    "attributes": {"create": {"type": "string", "optional": true}}
                },
                "optional": true
            }}})),
            "test",
        )
        .unwrap();
        assert!(matches!(body.attributes["timeouts"].constraint, Constraint::Object(_)));
    }

    #[test]
    fn attribute_without_type_is_rejected() {
        let err = body_from_block(&block(json!({"attributes": {"x": {"optional": true}}})), "resource r")
            .unwrap_err();
        match err {
            ConvertError::InvalidAttribute { path, .. } => assert_eq!(path, "resource r > x"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn attribute_with_both_types_is_rejected() {
        let err = body_from_block(
            &block(json!({"attributes": {"x": {
                "type": "string",
                "nested_type": {"nesting_mode": "single", "attributes": {}}
            }}})),
            "test",
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidAttribute { .. }));
    }

    #[test]
    fn inconsistent_nesting_is_rejected() {
        let single = block(json!({"block_types": {"b": {
            "nesting_mode": "single", "max_items": 2, "block": {}
        }}}));
        assert!(matches!(
            body_from_block(&single, "test"),
            Err(ConvertError::InconsistentNesting { .. })
        ));

        let inverted = block(json!({"block_types": {"b": {
            "nesting_mode": "list", "min_items": 3, "max_items": 1, "block": {}
        }}}));
        assert!(matches!(
            body_from_block(&inverted, "test"),
            Err(ConvertError::InconsistentNesting { .. })
        ));

        let unbounded = block(json!({"block_types": {"b": {
            "nesting_mode": "list", "min_items": 3, "block": {}
        }}}));
        assert!(body_from_block(&unbounded, "test").is_ok());
    }

    #[test]
    fn empty_description_is_nil() {
        let body = body_from_block(
            &block(json!({"attributes": {"x": {"type": "string", "description": "", "description_kind": "markdown"}}})),
            "test",
        )
        .unwrap();
        assert_eq!(body.attributes["x"].description, MarkupContent::default());
    }

    #[test]
    fn nested_blocks_keep_shape() {
        let body = body_from_block(
            &block(json!({"block_types": {"timeouts": {
                "nesting_mode": "group",
                "block": {"attributes": {"create": {"type": "string", "optional": true}}}
            }, "rule": {
                "nesting_mode": "set", "min_items": 1, "max_items": 5,
                "block": {"attributes": {"port": {"type": "number", "required": true}}, "deprecated": true}
            }}})),
            "test",
        )
        .unwrap();
        assert_eq!(body.blocks["timeouts"].nesting, NestingMode::Single);
        let rule = &body.blocks["rule"];
        assert_eq!(rule.nesting, NestingMode::Set);
        assert_eq!((rule.min_items, rule.max_items), (1, 5));
        assert!(rule.is_deprecated);
        assert!(rule.body.attributes["port"].is_required);
    }

    #[test]
    fn function_description_falls_back_to_summary() {
        let f: WireFunction = serde_json::from_value(json!({
            "summary": "Parses an ARN",
            "return_type": ["object", {"partition": "string"}],
            "parameters": [{"name": "arn", "type": "string"}],
            "variadic_parameter": {"name": "rest", "type": "dynamic", "is_nullable": true}
        }))
        .unwrap();
        let sig = convert_function(&f, "arn_parse").unwrap();
        assert_eq!(sig.description, "Parses an ARN");
        assert_eq!(sig.params[0].ty, Type::String);
        assert!(sig.var_param.as_ref().unwrap().allow_null);
        assert!(sig.return_type.is_object());
    }
}
