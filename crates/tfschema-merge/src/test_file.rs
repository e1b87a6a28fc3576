//! # Test File Schema Merger
//!
//! One merger serves both kinds of test file, since both describe plugin
//! objects as values rather than as bodies:
//!
//! - **test files**: `provider` hosts plugin configuration shapes,
//!   `mock_provider` hosts `mock_resource` / `mock_data` blocks whose
//!   `defaults` object mirrors each shape, and `variables` / `run.variables`
//!   gain the variables of the unit under test;
//! - **policy test files**: `resource`, `data` and `provider` host an
//!   `attrs` object mirroring the shape under test.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tfschema_core::{Address, AttributeSchema, BlockSchema, BodySchema, MarkupContent, ScopeId};

use crate::compose::{label_key, optional_object, register, resolve_plugins, ResolvedPlugin};
use crate::error::MergeError;
use crate::meta::UnitMeta;
use crate::reader::StateReader;
use crate::reference::ReferenceTargetBuilder;

/// Which kind of test file is being composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestKind {
    /// Module test files.
    Test,
    /// Policy test files.
    PolicyTest,
}

/// Merger for test and policy test files.
#[derive(Debug)]
pub struct TestSchemaMerger<'a, R: ?Sized> {
    reader: &'a R,
    kind: TestKind,
    core_schema: Option<&'a BodySchema>,
}

impl<'a, R: StateReader + ?Sized> TestSchemaMerger<'a, R> {
    /// A merger for `kind` without a baseline.
    pub fn new(reader: &'a R, kind: TestKind) -> Self {
        Self {
            reader,
            kind,
            core_schema: None,
        }
    }

    /// Use `schema` as the baseline.
    pub fn with_core_schema(mut self, schema: &'a BodySchema) -> Self {
        self.core_schema = Some(schema);
        self
    }

    /// Compose the schema for the test files of the unit `meta`.
    ///
    /// # Errors
    ///
    /// Returns `MergeError::CoreSchemaRequired` without a baseline.
    pub fn schema_for_test(&self, meta: &UnitMeta) -> Result<BodySchema, MergeError> {
        let core = self.core_schema.ok_or(MergeError::CoreSchemaRequired)?;
        let mut schema = core.clone();
        let plugins = resolve_plugins(self.reader, meta, None);

        match self.kind {
            TestKind::Test => {
                for plugin in &plugins {
                    register_test_plugin(&mut schema, plugin)?;
                }
                add_unit_variables(&mut schema, meta);
            }
            TestKind::PolicyTest => {
                for plugin in &plugins {
                    register_policy_test_plugin(&mut schema, plugin)?;
                }
            }
        }
        Ok(schema)
    }
}

fn register_test_plugin(schema: &mut BodySchema, plugin: &ResolvedPlugin) -> Result<(), MergeError> {
    if let (Some(config), Some(host)) = (&plugin.schema.provider, schema.blocks.get_mut("provider")) {
        for local_name in plugin.local_names() {
            register(host, "provider", label_key(local_name)?, config.clone());
        }
    }

    let Some(host) = schema.blocks.get_mut("mock_provider") else {
        return Ok(());
    };
    let mut body = BodySchema::default();
    for (block_name, shapes) in [
        ("mock_resource", &plugin.schema.resources),
        ("mock_data", &plugin.schema.data_sources),
    ] {
        let Some(template) = host.body.blocks.get(block_name) else {
            continue;
        };
        body.blocks
            .insert(block_name.to_string(), mock_block(template, block_name, shapes)?);
    }
    for local_name in plugin.local_names() {
        register(host, "mock_provider", label_key(local_name)?, body.clone());
    }
    Ok(())
}

/// A `mock_resource` / `mock_data` block with one `defaults` shape per type.
fn mock_block(
    template: &BlockSchema,
    block_name: &str,
    shapes: &BTreeMap<String, BodySchema>,
) -> Result<BlockSchema, MergeError> {
    let mut block = template.clone();
    for (type_name, shape) in shapes {
        let mut body = BodySchema::default();
        body.attributes.insert(
            "defaults".into(),
            value_attribute(shape, type_name, "Default attribute values"),
        );
        register(&mut block, block_name, label_key(type_name)?, body);
    }
    Ok(block)
}

fn register_policy_test_plugin(schema: &mut BodySchema, plugin: &ResolvedPlugin) -> Result<(), MergeError> {
    for (host_name, shapes) in [
        ("resource", &plugin.schema.resources),
        ("data", &plugin.schema.data_sources),
    ] {
        let Some(host) = schema.blocks.get_mut(host_name) else {
            continue;
        };
        for (type_name, shape) in shapes {
            register(host, host_name, label_key(type_name)?, attrs_body(shape, type_name));
        }
    }

    if let (Some(config), Some(host)) = (&plugin.schema.provider, schema.blocks.get_mut("provider")) {
        for local_name in plugin.local_names() {
            register(host, "provider", label_key(local_name)?, attrs_body(config, local_name));
        }
    }
    Ok(())
}

fn attrs_body(shape: &BodySchema, name: &str) -> BodySchema {
    let mut body = BodySchema {
        detail: shape.detail.clone(),
        docs_link: shape.docs_link.clone(),
        ..BodySchema::default()
    };
    body.attributes.insert(
        "attrs".into(),
        value_attribute(shape, name, "Attribute values of the object"),
    );
    body
}

fn value_attribute(shape: &BodySchema, name: &str, description: &str) -> AttributeSchema {
    AttributeSchema {
        description: MarkupContent::plain_text(description),
        is_optional: true,
        constraint: optional_object(shape, Some(name.to_string())),
        ..AttributeSchema::default()
    }
}

/// `variables` and `run.variables` accept the variables of the unit under test.
fn add_unit_variables(schema: &mut BodySchema, meta: &UnitMeta) {
    if meta.variables.is_empty() {
        return;
    }
    let builder = ReferenceTargetBuilder::new(meta, Address::root("var"), ScopeId::new(ScopeId::VARIABLE));
    // Values set in a test file never have to cover every variable.
    let attributes: BTreeMap<String, AttributeSchema> = builder
        .input_attributes()
        .into_iter()
        .map(|(name, attr)| {
            let attr = AttributeSchema {
                is_required: false,
                is_optional: true,
                ..attr
            };
            (name, attr)
        })
        .collect();

    if let Some(variables) = schema.blocks.get_mut("variables") {
        variables.body.attributes.extend(attributes.clone());
    }
    if let Some(run_variables) = schema
        .blocks
        .get_mut("run")
        .and_then(|run| run.body.blocks.get_mut("variables"))
    {
        run_variables.body.attributes.extend(attributes);
    }
}
