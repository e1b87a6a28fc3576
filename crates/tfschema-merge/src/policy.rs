//! # Policy Schema Merger
//!
//! Policies are written against the shapes of the objects they police.
//! `resource_policy "<type>" "<name>"` and `provider_policy "<local>"
//! "<name>"` gain, under `{label0 = ...}`, a body whose only contribution
//! is the `attrs` target typed as the policed shape.

use tfschema_core::BodySchema;

use crate::compose::{attrs_targetable, label_key, register, resolve_plugins};
use crate::error::MergeError;
use crate::meta::UnitMeta;
use crate::reader::StateReader;

/// Merger for policy units.
#[derive(Debug)]
pub struct PolicySchemaMerger<'a, R: ?Sized> {
    reader: &'a R,
    core_schema: Option<&'a BodySchema>,
}

impl<'a, R: StateReader + ?Sized> PolicySchemaMerger<'a, R> {
    /// A merger without a baseline.
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            core_schema: None,
        }
    }

    /// Use `schema` as the policy baseline.
    pub fn with_core_schema(mut self, schema: &'a BodySchema) -> Self {
        self.core_schema = Some(schema);
        self
    }

    /// Compose the schema for one policy unit.
    ///
    /// # Errors
    ///
    /// Returns `MergeError::CoreSchemaRequired` without a baseline.
    pub fn schema_for_policy(&self, meta: &UnitMeta) -> Result<BodySchema, MergeError> {
        let core = self.core_schema.ok_or(MergeError::CoreSchemaRequired)?;
        let mut schema = core.clone();

        for plugin in resolve_plugins(self.reader, meta, None) {
            if let Some(host) = schema.blocks.get_mut("resource_policy") {
                for (type_name, shape) in &plugin.schema.resources {
                    register(host, "resource_policy", label_key(type_name)?, policed(shape));
                }
            }
            if let (Some(config), Some(host)) =
                (&plugin.schema.provider, schema.blocks.get_mut("provider_policy"))
            {
                for local_name in plugin.local_names() {
                    register(host, "provider_policy", label_key(local_name)?, policed(config));
                }
            }
        }
        Ok(schema)
    }
}

fn policed(shape: &BodySchema) -> BodySchema {
    BodySchema {
        detail: shape.detail.clone(),
        description: shape.description.clone(),
        docs_link: shape.docs_link.clone(),
        targetable_as: vec![attrs_targetable(shape)],
        ..BodySchema::default()
    }
}
