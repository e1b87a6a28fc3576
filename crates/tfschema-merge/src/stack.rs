//! # Stack Schema Merger
//!
//! Stack files configure providers once and pass them to components:
//!
//! - `provider "<local>" "<name>"` hosts, under `{label0 = local name}`, a
//!   body whose `config` block carries the plugin's configuration shape;
//! - `component "<name>"` hosts, under `{label0 = name, source =
//!   "<source>"}`, an `inputs` object built from the child unit's variables
//!   and the `component.<name>` target tree.

use tfschema_core::{
    AttributeSchema, BlockSchema, BodySchema, Constraint, MarkupContent, ObjectConstraint,
};

use crate::compose::{label_key, register, resolve_plugins, source_key};
use crate::error::MergeError;
use crate::meta::UnitMeta;
use crate::reader::StateReader;
use crate::reference::ReferenceTargetBuilder;

/// Merger for stack units.
#[derive(Debug)]
pub struct StackSchemaMerger<'a, R: ?Sized> {
    reader: &'a R,
    core_schema: Option<&'a BodySchema>,
}

impl<'a, R: StateReader + ?Sized> StackSchemaMerger<'a, R> {
    /// A merger without a baseline.
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            core_schema: None,
        }
    }

    /// Use `schema` as the stack baseline.
    pub fn with_core_schema(mut self, schema: &'a BodySchema) -> Self {
        self.core_schema = Some(schema);
        self
    }

    /// Compose the schema for one stack.
    ///
    /// # Errors
    ///
    /// Returns `MergeError::CoreSchemaRequired` without a baseline.
    pub fn schema_for_stack(&self, meta: &UnitMeta) -> Result<BodySchema, MergeError> {
        let core = self.core_schema.ok_or(MergeError::CoreSchemaRequired)?;
        let mut schema = core.clone();

        if let Some(host) = schema.blocks.get_mut("provider") {
            let config_block = host.body.blocks.get("config").cloned().unwrap_or_default();
            for plugin in resolve_plugins(self.reader, meta, None) {
                let Some(config) = &plugin.schema.provider else {
                    continue;
                };
                let mut body = BodySchema {
                    detail: config.detail.clone(),
                    docs_link: config.docs_link.clone(),
                    ..BodySchema::default()
                };
                body.blocks.insert(
                    "config".into(),
                    BlockSchema {
                        body: config.clone(),
                        ..config_block.clone()
                    },
                );
                for local_name in plugin.local_names() {
                    register(host, "provider", label_key(local_name)?, body.clone());
                }
            }
        }

        if let Some(host) = schema.blocks.get_mut("component") {
            self.register_components(host, meta)?;
        }
        Ok(schema)
    }

    fn register_components(&self, host: &mut BlockSchema, meta: &UnitMeta) -> Result<(), MergeError> {
        for (name, call) in &meta.calls {
            let child = match self.reader.unit_meta(call.unit_path()) {
                Ok(child) => child,
                Err(e) => {
                    tracing::warn!(component = %name, source = %call.source, error = %e, "skipping component");
                    continue;
                }
            };
            let targets = ReferenceTargetBuilder::component(&child, name).build();
            let any_required = targets.attributes.values().any(|attr| attr.is_required);
            let inputs = AttributeSchema {
                description: MarkupContent::plain_text("Input variable values of the component"),
                is_required: any_required,
                is_optional: !any_required,
                constraint: Constraint::Object(ObjectConstraint {
                    attributes: targets.attributes,
                    name: None,
                }),
                ..AttributeSchema::default()
            };

            let mut body = BodySchema {
                targets: targets.target,
                targetable_as: vec![targets.targetable],
                ..BodySchema::default()
            };
            body.attributes.insert("inputs".into(), inputs);
            register(host, "component", source_key(name, &call.source)?, body);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{UnitCall, Variable};
    use crate::reader::MemoryStateReader;
    use serde_json::json;
    use tfschema_core::{PluginAddr, PluginRef, PluginSchema, Type, UnitPath};
    use tfschema_versions::SchemaFamily;

    fn stack_core() -> &'static BodySchema {
        SchemaFamily::Stack.table().latest()
    }

    #[test]
    fn provider_config_lands_in_config_block() {
        let aws = PluginAddr::new("hashicorp", "aws");
        let mut config = BodySchema::default();
        config.attributes.insert(
            "region".into(),
            AttributeSchema {
                is_optional: true,
                constraint: Constraint::for_type(&Type::String),
                ..AttributeSchema::default()
            },
        );
        let plugin = PluginSchema {
            provider: Some(config.clone()),
            ..PluginSchema::default()
        };
        let reader = MemoryStateReader::new().with_plugin(aws.clone(), plugin);
        let mut meta = UnitMeta::default();
        meta.plugin_references.insert(PluginRef::new("aws"), aws);

        let merged = StackSchemaMerger::new(&reader)
            .with_core_schema(stack_core())
            .schema_for_stack(&meta)
            .unwrap();
        let body = merged.blocks["provider"]
            .dependent_body(&label_key("aws").unwrap())
            .unwrap();
        assert_eq!(body.blocks["config"].body, config);
        assert_eq!(body.blocks["config"].max_items, 1);
    }

    #[test]
    fn component_inputs_follow_child_variables() {
        let child = UnitMeta {
            path: UnitPath {
                path: "./api".into(),
                language_id: "terraform".into(),
            },
            variables: [
                ("name".to_string(), Variable::default()),
                (
                    "replicas".to_string(),
                    Variable {
                        default: Some(json!(2)),
                        ..Variable::default()
                    },
                ),
            ]
            .into_iter()
            .collect(),
            ..UnitMeta::default()
        };
        let reader = MemoryStateReader::new().with_unit(child);
        let mut meta = UnitMeta::default();
        meta.calls.insert(
            "api".into(),
            UnitCall {
                source: "./api".into(),
                ..UnitCall::default()
            },
        );

        let merged = StackSchemaMerger::new(&reader)
            .with_core_schema(stack_core())
            .schema_for_stack(&meta)
            .unwrap();
        let body = merged.blocks["component"]
            .dependent_body(&source_key("api", "./api").unwrap())
            .unwrap();
        let inputs = &body.attributes["inputs"];
        assert!(inputs.is_required);
        let Constraint::Object(object) = &inputs.constraint else {
            panic!("expected object inputs");
        };
        assert!(object.attributes["name"].is_required);
        assert!(object.attributes["replicas"].is_optional);
        assert_eq!(body.targetable_as[0].address.to_string(), "component.api");
    }

    #[test]
    fn missing_component_is_skipped() {
        let reader = MemoryStateReader::new();
        let mut meta = UnitMeta::default();
        meta.calls.insert(
            "gone".into(),
            UnitCall {
                source: "./gone".into(),
                ..UnitCall::default()
            },
        );
        let merged = StackSchemaMerger::new(&reader)
            .with_core_schema(stack_core())
            .schema_for_stack(&meta)
            .unwrap();
        assert_eq!(&merged, stack_core());
    }
}
