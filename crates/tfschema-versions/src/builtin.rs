//! # Built-in Plugin
//!
//! `terraform.io/builtin/terraform` ships inside the language runtime. It is
//! available to every module without a requirement declaration, under the
//! local name `terraform`.

use semver::Version;
use tfschema_core::{
    FunctionParameter, FunctionSignature, PluginAddr, PluginSchema, Type,
};

use crate::builder::{body, computed, optional, required, typed, AttributeExt, BodyExt};
use crate::table::{TableEntry, VersionedTable};

/// Local name under which the built-in plugin is always referenced.
pub const BUILTIN_LOCAL_NAME: &str = "terraform";

/// Data source whose `config` is narrowed per backend type.
pub const REMOTE_STATE_DATA_SOURCE: &str = "terraform_remote_state";

static ENTRIES: [TableEntry<PluginSchema>; 3] = [
    TableEntry::base(Version::new(0, 12, 0), base_0_12),
    TableEntry::patch(Version::new(1, 4, 0), patch_1_4),
    TableEntry::patch(Version::new(1, 8, 0), patch_1_8),
];

/// Built-in plugin shapes by language version.
pub static BUILTIN_PLUGIN: VersionedTable<PluginSchema> =
    VersionedTable::new("builtin", &ENTRIES);

/// Canonical address of the built-in plugin.
pub fn builtin_addr() -> PluginAddr {
    PluginAddr::builtin(BUILTIN_LOCAL_NAME)
}

fn base_0_12() -> PluginSchema {
    let remote_state = body()
        .attr(
            "backend",
            required(typed(Type::String), "The remote backend to use, e.g. `remote`").dep_key(),
        )
        .attr(
            "config",
            optional(typed(Type::Dynamic), "The configuration of the remote backend"),
        )
        .attr(
            "defaults",
            optional(typed(Type::Dynamic), "Default values for outputs, in case the state file is empty or lacks a required output"),
        )
        .attr(
            "workspace",
            optional(typed(Type::String), "The Terraform workspace to use, if the backend supports workspaces"),
        )
        .attr(
            "outputs",
            computed(Type::Dynamic, "An object containing every root-level output in the remote state"),
        );

    let mut schema = PluginSchema {
        provider: Some(body()),
        ..PluginSchema::default()
    };
    schema
        .data_sources
        .insert(REMOTE_STATE_DATA_SOURCE.to_string(), remote_state);
    schema.annotate(&builtin_addr());
    schema
}

fn patch_1_4(schema: &mut PluginSchema) {
    let data = body()
        .attr(
            "input",
            optional(typed(Type::Dynamic), "A value which will be stored in the instance state, and reflected in the `output` attribute after apply"),
        )
        .attr(
            "triggers_replace",
            optional(typed(Type::Dynamic), "A value which is stored in the instance state, and will force replacement when the value changes"),
        )
        .attr("id", computed(Type::String, "A unique value for the resource instance"))
        .attr("output", computed(Type::Dynamic, "The computed value derived from the `input` argument"));
    schema.resources.insert("terraform_data".to_string(), data);
    schema.annotate(&builtin_addr());
}

fn patch_1_8(schema: &mut PluginSchema) {
    schema.functions.insert(
        "encode_tfvars".to_string(),
        FunctionSignature::new(
            "Produces a string representation of an object using the same syntax as `.tfvars` files",
            vec![FunctionParameter::new("value", Type::Dynamic)],
            Type::String,
        ),
    );
    schema.functions.insert(
        "decode_tfvars".to_string(),
        FunctionSignature::new(
            "Parses a string containing `.tfvars` syntax and returns an object",
            vec![FunctionParameter::new("src", Type::String)],
            Type::Dynamic,
        ),
    );
    schema.functions.insert(
        "encode_expr".to_string(),
        FunctionSignature::new(
            "Produces a string representation of an arbitrary value using expression syntax",
            vec![FunctionParameter::new("value", Type::Dynamic)],
            Type::String,
        ),
    );
    schema.annotate(&builtin_addr());
}
