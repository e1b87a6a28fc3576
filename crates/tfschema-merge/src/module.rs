//! # Module Schema Merger
//!
//! Composes the schema of a module unit:
//!
//! - `provider` hosts each plugin's configuration shape under
//!   `{label0 = local name}`;
//! - `resource`, `data` and `ephemeral` host each shape under the explicit
//!   `provider = <ref>` key and, where the type name belongs to the
//!   reference's local name, the implicit `{label0 = type}` key;
//! - `data` additionally hosts `terraform_remote_state` once per backend
//!   type, with `config` narrowed to that backend's arguments;
//! - `module` hosts each call's child-unit targets under
//!   `{label0 = call name, source = "<source>"}`.
//!
//! The built-in plugin is served from the versioned built-in table rather
//! than the reader, whenever the unit references it.

use std::collections::BTreeMap;

use tfschema_core::{
    AttributeSchema, BlockSchema, BodySchema, Constraint, DependencyKeys, ExpressionValue,
    ObjectConstraint, PluginRef,
};
use tfschema_versions::semver::Version;
use tfschema_versions::{BACKENDS, REMOTE_STATE_DATA_SOURCE};

use crate::compose::{
    association_keys, builtin_schema, label_key, register, register_shapes, resolve_plugins,
    source_key,
};
use crate::error::MergeError;
use crate::meta::UnitMeta;
use crate::reader::StateReader;
use crate::reference::ReferenceTargetBuilder;

/// Merger for module units.
#[derive(Debug)]
pub struct ModuleSchemaMerger<'a, R: ?Sized> {
    reader: &'a R,
    core_schema: Option<(&'a BodySchema, Version)>,
}

impl<'a, R: StateReader + ?Sized> ModuleSchemaMerger<'a, R> {
    /// A merger without a baseline; set one with
    /// [`with_core_schema`](Self::with_core_schema) before merging.
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            core_schema: None,
        }
    }

    /// Use `schema`, the baseline of language version `version`.
    ///
    /// The version selects the backend catalog and built-in plugin.
    pub fn with_core_schema(mut self, schema: &'a BodySchema, version: Version) -> Self {
        self.core_schema = Some((schema, version));
        self
    }

    /// Compose the schema for one module unit.
    ///
    /// The baseline is copied, never modified. Plugins and calls the reader
    /// cannot supply are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns `MergeError::CoreSchemaRequired` without a baseline. A version
    /// the built-in tables do not cover only drops the built-in contributions.
    pub fn schema_for_unit(&self, meta: &UnitMeta) -> Result<BodySchema, MergeError> {
        let (core, version) = self
            .core_schema
            .as_ref()
            .ok_or(MergeError::CoreSchemaRequired)?;
        let mut schema = (*core).clone();

        let builtin = builtin_schema(meta, version);
        for plugin in resolve_plugins(self.reader, meta, builtin) {
            tracing::debug!(plugin = %plugin.addr, refs = plugin.refs.len(), "merging plugin");
            for reference in &plugin.refs {
                if let (Some(config), Some(host)) =
                    (&plugin.schema.provider, schema.blocks.get_mut("provider"))
                {
                    register(host, "provider", label_key(&reference.local_name)?, config.clone());
                }
                if let Some(host) = schema.blocks.get_mut("resource") {
                    register_shapes(host, "resource", reference, &plugin.schema.resources)?;
                }
                if let Some(host) = schema.blocks.get_mut("data") {
                    register_shapes(host, "data", reference, &plugin.schema.data_sources)?;
                }
                if let Some(host) = schema.blocks.get_mut("ephemeral") {
                    register_shapes(host, "ephemeral", reference, &plugin.schema.ephemeral_resources)?;
                }
            }

            if plugin.addr.is_builtin() {
                if let Some(host) = schema.blocks.get_mut("data") {
                    register_remote_state(host, &plugin.refs, &plugin.schema.data_sources, version)?;
                }
            }
        }

        if let Some(host) = schema.blocks.get_mut("module") {
            self.register_calls(host, meta)?;
        }
        Ok(schema)
    }

    fn register_calls(&self, host: &mut BlockSchema, meta: &UnitMeta) -> Result<(), MergeError> {
        for (name, call) in &meta.calls {
            let child = match self.reader.unit_meta(call.unit_path()) {
                Ok(child) => child,
                Err(e) => {
                    tracing::warn!(call = %name, source = %call.source, error = %e, "skipping module call");
                    continue;
                }
            };
            let body = ReferenceTargetBuilder::module_call(&child, name).build().into_body();
            register(host, "module", source_key(name, &call.source)?, body);
        }
        Ok(())
    }
}

/// Register the remote-state data source once per backend type.
fn register_remote_state(
    host: &mut BlockSchema,
    refs: &[PluginRef],
    data_sources: &BTreeMap<String, BodySchema>,
    version: &Version,
) -> Result<(), MergeError> {
    let Some(remote_state) = data_sources.get(REMOTE_STATE_DATA_SOURCE) else {
        return Ok(());
    };
    let backends = match BACKENDS.get(version) {
        Ok(backends) => backends,
        Err(e) => {
            tracing::warn!(%version, error = %e, "backend catalog unavailable, skipping remote state");
            return Ok(());
        }
    };

    for (backend, config) in backends {
        let mut body = remote_state.clone();
        let narrowed = body
            .attributes
            .get("config")
            .map(|attr| AttributeSchema {
                constraint: Constraint::Object(ObjectConstraint {
                    attributes: config.attributes.clone(),
                    name: Some(backend.clone()),
                }),
                ..attr.clone()
            });
        if let Some(narrowed) = narrowed {
            body.attributes.insert("config".into(), narrowed);
        }

        let base = DependencyKeys::default()
            .with_attribute("backend", ExpressionValue::static_string(backend.clone()));
        for reference in refs {
            for key in association_keys(reference, REMOTE_STATE_DATA_SOURCE, &base)? {
                register(host, "data", key, body.clone());
            }
        }
    }
    Ok(())
}
