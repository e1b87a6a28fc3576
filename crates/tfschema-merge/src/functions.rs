//! # Functions Merger
//!
//! Plugin functions are callable as `provider::<local name>::<function>`.
//! Below language version 1.8.0 plugin functions do not exist; the merger
//! then returns the baseline function set untouched.

use tfschema_versions::semver::Version;
use tfschema_versions::FunctionTable;

use crate::compose::{builtin_schema, resolve_plugins};
use crate::error::MergeError;
use crate::meta::UnitMeta;
use crate::reader::StateReader;

/// First language version with plugin functions.
pub const PLUGIN_FUNCTIONS_SINCE: Version = Version::new(1, 8, 0);

/// Namespace marker of plugin function names.
const NAMESPACE: &str = "provider";

/// Merger of plugin function signatures into the baseline function set.
#[derive(Debug)]
pub struct FunctionsMerger<'a, R: ?Sized> {
    reader: &'a R,
    core_functions: Option<(&'a FunctionTable, Version)>,
}

impl<'a, R: StateReader + ?Sized> FunctionsMerger<'a, R> {
    /// A merger without a baseline.
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            core_functions: None,
        }
    }

    /// Use `functions`, the built-in set of language version `version`.
    pub fn with_core_functions(mut self, functions: &'a FunctionTable, version: Version) -> Self {
        self.core_functions = Some((functions, version));
        self
    }

    /// Merged function signatures for one unit.
    ///
    /// # Errors
    ///
    /// Returns `MergeError::CoreSchemaRequired` without a baseline.
    pub fn functions_for_unit(&self, meta: &UnitMeta) -> Result<FunctionTable, MergeError> {
        let (core, version) = self
            .core_functions
            .as_ref()
            .ok_or(MergeError::CoreSchemaRequired)?;
        let mut functions = (*core).clone();

        if *version < PLUGIN_FUNCTIONS_SINCE {
            tracing::debug!(%version, "plugin functions unsupported, keeping baseline");
            return Ok(functions);
        }

        let builtin = builtin_schema(meta, version);
        for plugin in resolve_plugins(self.reader, meta, builtin) {
            for local_name in plugin.local_names() {
                for (name, signature) in &plugin.schema.functions {
                    let qualified = format!("{NAMESPACE}::{local_name}::{name}");
                    tracing::debug!(plugin = %plugin.addr, function = %qualified, "registered function");
                    functions.insert(qualified, signature.clone());
                }
            }
        }
        Ok(functions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::MemoryStateReader;
    use tfschema_core::{FunctionParameter, FunctionSignature, PluginAddr, PluginRef, PluginSchema, Type};
    use tfschema_versions::FUNCTIONS;

    fn aws_reader() -> (MemoryStateReader, UnitMeta) {
        let aws = PluginAddr::new("hashicorp", "aws");
        let mut plugin = PluginSchema::default();
        plugin.functions.insert(
            "arn_parse".into(),
            FunctionSignature::new(
                "Parses an ARN",
                vec![FunctionParameter::new("arn", Type::String)],
                Type::Dynamic,
            ),
        );
        let reader = MemoryStateReader::new().with_plugin(aws.clone(), plugin);
        let mut meta = UnitMeta::default().with_builtin_reference();
        meta.plugin_references.insert(PluginRef::new("aws"), aws.clone());
        meta.plugin_references.insert(PluginRef::aliased("aws", "west"), aws);
        (reader, meta)
    }

    #[test]
    fn below_1_8_returns_baseline() {
        let (reader, meta) = aws_reader();
        let version = Version::new(1, 7, 5);
        let core = FUNCTIONS.get(&version).unwrap();
        let merged = FunctionsMerger::new(&reader)
            .with_core_functions(core, version)
            .functions_for_unit(&meta)
            .unwrap();
        assert_eq!(&merged, core);
    }

    #[test]
    fn plugin_functions_are_namespaced() {
        let (reader, meta) = aws_reader();
        let version = Version::new(1, 8, 0);
        let core = FUNCTIONS.get(&version).unwrap();
        let merged = FunctionsMerger::new(&reader)
            .with_core_functions(core, version)
            .functions_for_unit(&meta)
            .unwrap();

        assert!(merged.contains_key("provider::aws::arn_parse"));
        assert!(merged.contains_key("provider::terraform::encode_tfvars"));
        assert!(merged.contains_key("provider::terraform::decode_tfvars"));
        assert!(merged.contains_key("provider::terraform::encode_expr"));
        assert!(merged.contains_key("upper"));
        // Aliases share the local name's namespace.
        assert_eq!(merged.len(), core.len() + 4);
    }

    #[test]
    fn builtin_functions_need_a_builtin_reference() {
        let (reader, mut meta) = aws_reader();
        meta.plugin_references.retain(|_, addr| !addr.is_builtin());
        let version = Version::new(1, 8, 0);
        let core = FUNCTIONS.get(&version).unwrap();
        let merged = FunctionsMerger::new(&reader)
            .with_core_functions(core, version)
            .functions_for_unit(&meta)
            .unwrap();

        assert!(merged.contains_key("provider::aws::arn_parse"));
        assert!(!merged.contains_key("provider::terraform::encode_tfvars"));
        assert_eq!(merged.len(), core.len() + 1);
    }

    #[test]
    fn no_baseline_is_an_error() {
        let reader = MemoryStateReader::new();
        assert!(matches!(
            FunctionsMerger::new(&reader).functions_for_unit(&UnitMeta::default()),
            Err(MergeError::CoreSchemaRequired)
        ));
    }
}
