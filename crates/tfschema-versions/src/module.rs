//! # Module Baseline
//!
//! The configuration language's own blocks for module files, built from the
//! 0.12 base and patched forward one language release at a time.

use semver::Version;
use tfschema_core::{BlockSchema, BodySchema, Constraint, NestingMode, ScopeId, Type};

use crate::builder::{
    any, block, body, condition_block, key_label, keywords, label, lifecycle,
    literal_string, optional, patch_block, provider_map, reference, reference_list, required,
    typed, AttributeExt, BlockExt, BodyExt,
};
use crate::table::{TableEntry, VersionedTable};

static ENTRIES: [TableEntry<BodySchema>; 9] = [
    TableEntry::base(Version::new(0, 12, 0), base_0_12),
    TableEntry::patch(Version::new(0, 13, 0), patch_0_13),
    TableEntry::patch(Version::new(0, 14, 0), patch_0_14),
    TableEntry::patch(Version::new(0, 15, 0), patch_0_15),
    TableEntry::patch(Version::new(1, 1, 0), patch_1_1),
    TableEntry::patch(Version::new(1, 2, 0), patch_1_2),
    TableEntry::patch(Version::new(1, 5, 0), patch_1_5),
    TableEntry::patch(Version::new(1, 7, 0), patch_1_7),
    TableEntry::patch(Version::new(1, 10, 0), patch_1_10),
];

/// Module-file baselines.
pub static CORE_SCHEMAS: VersionedTable<BodySchema> = VersionedTable::new("core", &ENTRIES);

fn base_0_12() -> BodySchema {
    body()
        .block("terraform", terraform_block())
        .block("provider", provider_block())
        .block("resource", resource_block())
        .block("data", data_block())
        .block("variable", variable_block())
        .block("output", output_block())
        .block("locals", locals_block())
        .block("module", module_block())
}

fn terraform_block() -> BlockSchema {
    let backend = block(
        "Backend configuration, which determines where state is stored",
        vec![key_label("type", "Backend type")],
        body(),
    )
    .at_most(1);
    let required_providers = block(
        "What provider version to use within this configuration",
        vec![],
        body().any_attribute(optional(typed(Type::String), "Version constraint")),
    )
    .at_most(1);

    block(
        "Terraform block used to configure some high-level behaviors of Terraform",
        vec![],
        body()
            .attr(
                "required_version",
                optional(
                    literal_string(),
                    "Constraint to specify which versions of Terraform can be used with this configuration",
                ),
            )
            .attr(
                "experiments",
                optional(
                    Constraint::Set {
                        elem: Box::new(Constraint::Keyword("experiment".into())),
                        min_items: 0,
                        max_items: 0,
                    },
                    "A set of experimental language features to enable",
                ),
            )
            .block("backend", backend)
            .block("required_providers", required_providers),
    )
    .at_most(1)
}

fn provider_block() -> BlockSchema {
    block(
        "A provider block is used to specify a provider configuration",
        vec![key_label("name", "Provider name")],
        body()
            .attr(
                "alias",
                optional(
                    literal_string(),
                    "Alias for using the same provider with different configurations for different resources",
                ),
            )
            .attr(
                "version",
                optional(literal_string(), "Specifies a version constraint for the provider"),
            ),
    )
    .nesting(NestingMode::List)
}

fn meta_arguments() -> BodySchema {
    body()
        .attr(
            "count",
            optional(typed(Type::Number), "Number of instances of this block to create"),
        )
        .attr(
            "for_each",
            optional(
                Constraint::OneOf(vec![
                    typed(Type::map(Type::Dynamic)),
                    typed(Type::set(Type::String)),
                ]),
                "A meta-argument that accepts a map or a set of strings, and creates an instance for each item",
            ),
        )
        .attr(
            "provider",
            optional(
                reference(ScopeId::PROVIDER),
                "Reference to a `provider` configuration block, e.g. `mycloud.west`",
            )
            .dep_key(),
        )
        .attr(
            "depends_on",
            optional(reference_list(), "Set of references to hidden dependencies"),
        )
}

fn resource_block() -> BlockSchema {
    let provisioner = block(
        "Provisioner to model specific actions on the local machine or on a remote machine",
        vec![key_label("type", "Type of provisioner to use")],
        body()
            .attr(
                "when",
                optional(keywords(&["create", "destroy"]), "When to run the provisioner"),
            )
            .attr(
                "on_failure",
                optional(keywords(&["continue", "fail"]), "What to do when the provisioner fails"),
            ),
    )
    .nesting(NestingMode::List);

    let connection = block(
        "Connection block describing how to access the remote resource",
        vec![],
        body()
            .attr("type", optional(keywords(&["ssh", "winrm"]), "Connection type"))
            .attr("host", required(typed(Type::String), "The address of the resource to connect to"))
            .attr("user", optional(typed(Type::String), "The user to use for the connection"))
            .attr(
                "password",
                optional(typed(Type::String), "The password to use for the connection").sensitive(),
            )
            .attr("port", optional(typed(Type::Number), "The port to connect to"))
            .attr("timeout", optional(typed(Type::String), "The timeout to wait for the connection"))
            .attr(
                "private_key",
                optional(typed(Type::String), "The contents of an SSH key to use for the connection")
                    .sensitive(),
            ),
    )
    .at_most(1);

    block(
        "A resource block declares a resource of a given type with a given local name",
        vec![
            key_label("type", "Resource Type"),
            label("name", "Reference Name"),
        ],
        meta_arguments()
            .block("lifecycle", lifecycle())
            .block("connection", connection)
            .block("provisioner", provisioner),
    )
    .nesting(NestingMode::List)
}

fn data_block() -> BlockSchema {
    block(
        "A data block requests that Terraform read from a given data source and export the result under the given local name",
        vec![
            key_label("type", "Data Source Type"),
            label("name", "Reference Name"),
        ],
        meta_arguments(),
    )
    .nesting(NestingMode::List)
}

fn variable_block() -> BlockSchema {
    block(
        "Input variable allowing users to customize aspects of the configuration",
        vec![label("name", "Variable Name")],
        body()
            .attr("description", optional(literal_string(), "Description to document the purpose of the variable"))
            .attr("default", optional(any(), "Default value to use when variable is not explicitly set"))
            .attr("type", optional(Constraint::TypeDeclaration, "Type constraint restricting the type of value to accept")),
    )
    .nesting(NestingMode::List)
}

fn output_block() -> BlockSchema {
    block(
        "Output value for consumption by another module or a human interacting via the UI",
        vec![label("name", "Output Name")],
        body()
            .attr("description", optional(literal_string(), "Human-readable description of the output"))
            .attr("value", required(any(), "Value, typically a reference to an attribute of a resource or a data source"))
            .attr("sensitive", optional(typed(Type::Bool), "Whether the output contains sensitive material"))
            .attr("depends_on", optional(reference_list(), "Set of references to hidden dependencies")),
    )
    .nesting(NestingMode::List)
}

fn locals_block() -> BlockSchema {
    block(
        "Local values assigning names to expressions, so you can use these multiple times without repetition",
        vec![],
        body().any_attribute(optional(any(), "Local value")),
    )
    .nesting(NestingMode::List)
}

fn module_block() -> BlockSchema {
    block(
        "Module block to call a locally or remotely stored module",
        vec![key_label("name", "Reference Name")],
        body()
            .attr(
                "source",
                required(
                    literal_string(),
                    "Source where to load the module from, a local directory or a remote address",
                )
                .dep_key(),
            )
            .attr(
                "version",
                optional(literal_string(), "Constraint to set the version of the module"),
            )
            .attr(
                "providers",
                optional(
                    provider_map(),
                    "Explicit mapping of the provider configurations to pass to the module",
                ),
            ),
    )
    .nesting(NestingMode::List)
}

fn patch_0_13(schema: &mut BodySchema) {
    patch_block(schema, "module", |module| {
        let meta = meta_arguments();
        for name in ["count", "for_each", "depends_on"] {
            if let Some(attr) = meta.attributes.get(name) {
                module.body.attributes.insert(name.to_string(), attr.clone());
            }
        }
    });
    patch_block(schema, "variable", |variable| {
        variable.body.blocks.insert(
            "validation".into(),
            condition_block("Custom validation rule for the variable"),
        );
    });
    patch_block(schema, "provider", |provider| {
        if let Some(version) = provider.body.attributes.get_mut("version") {
            version.is_deprecated = true;
        }
    });
    patch_block(schema, "terraform", |terraform| {
        let object = Type::Object {
            attributes: [("source", Type::String), ("version", Type::String)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            optional: ["source", "version"].into_iter().map(str::to_string).collect(),
        };
        if let Some(required_providers) = terraform.body.blocks.get_mut("required_providers") {
            required_providers.body.any_attribute =
                Some(Box::new(optional(typed(object), "Provider source and version requirement")));
        }
    });
}

fn patch_0_14(schema: &mut BodySchema) {
    patch_block(schema, "variable", |variable| {
        variable.body.attributes.insert(
            "sensitive".into(),
            optional(typed(Type::Bool), "Whether the variable contains sensitive material"),
        );
    });
}

fn patch_0_15(schema: &mut BodySchema) {
    patch_block(schema, "variable", |variable| {
        variable.body.attributes.insert(
            "nullable".into(),
            optional(typed(Type::Bool), "Whether the variable may be set to `null`"),
        );
    });
}

fn patch_1_1(schema: &mut BodySchema) {
    let moved = block(
        "Refactoring record: an object previously known by one address is now known by another",
        vec![],
        body()
            .attr("from", required(address(), "Previous address of the object"))
            .attr("to", required(address(), "New address of the object")),
    )
    .nesting(NestingMode::List);
    schema.blocks.insert("moved".into(), moved);
}

fn patch_1_2(schema: &mut BodySchema) {
    let conditions = |block: &mut BlockSchema| {
        if let Some(lifecycle) = block.body.blocks.get_mut("lifecycle") {
            lifecycle.body.blocks.insert(
                "precondition".into(),
                condition_block("Condition checked before planning the object"),
            );
            lifecycle.body.blocks.insert(
                "postcondition".into(),
                condition_block("Condition checked after planning the object"),
            );
        }
    };
    patch_block(schema, "resource", |resource| {
        conditions(resource);
        if let Some(lifecycle) = resource.body.blocks.get_mut("lifecycle") {
            lifecycle.body.attributes.insert(
                "replace_triggered_by".into(),
                optional(reference_list(), "References whose changes trigger replacement"),
            );
        }
    });
    patch_block(schema, "data", |data| {
        data.body.blocks.insert("lifecycle".into(), block("Lifecycle customizations", vec![], body()).at_most(1));
        conditions(data);
    });
    patch_block(schema, "output", |output| {
        output.body.blocks.insert(
            "precondition".into(),
            condition_block("Condition checked before the output value is recorded"),
        );
    });
}

fn patch_1_5(schema: &mut BodySchema) {
    let import = block(
        "Import an existing object into a resource address",
        vec![],
        body()
            .attr("to", required(address(), "Resource address to import into"))
            .attr("id", required(typed(Type::String), "Import identifier of the remote object"))
            .attr(
                "provider",
                optional(reference(ScopeId::PROVIDER), "Provider configuration to import with"),
            ),
    )
    .nesting(NestingMode::List);

    // `check` hosts a scoped data block with the same shape as top-level data.
    let scoped_data = schema
        .blocks
        .get("data")
        .cloned()
        .unwrap_or_else(data_block)
        .at_most(1);
    let check = block(
        "Continuous validation of infrastructure outside the usual resource lifecycle",
        vec![label("name", "Check Name")],
        body()
            .block("data", scoped_data)
            .block("assert", condition_block("Assertion evaluated on every plan and apply")),
    )
    .nesting(NestingMode::List);

    schema.blocks.insert("import".into(), import);
    schema.blocks.insert("check".into(), check);
}

fn patch_1_7(schema: &mut BodySchema) {
    let removed = block(
        "Declares that an object was removed from configuration",
        vec![],
        body()
            .attr("from", required(address(), "Address of the removed object"))
            .block(
                "lifecycle",
                block(
                    "Lifecycle customizations for the removed object",
                    vec![],
                    body().attr(
                        "destroy",
                        required(typed(Type::Bool), "Whether to destroy the object or forget it"),
                    ),
                )
                .at_most(1),
            ),
    )
    .nesting(NestingMode::List);
    schema.blocks.insert("removed".into(), removed);

    patch_block(schema, "import", |import| {
        let meta = meta_arguments();
        if let Some(for_each) = meta.attributes.get("for_each") {
            import.body.attributes.insert("for_each".into(), for_each.clone());
        }
    });
}

fn patch_1_10(schema: &mut BodySchema) {
    let ephemeral = block(
        "An ephemeral block declares a temporary resource whose data is never persisted",
        vec![
            key_label("type", "Ephemeral Resource Type"),
            label("name", "Reference Name"),
        ],
        meta_arguments().block("lifecycle", lifecycle()),
    )
    .nesting(NestingMode::List);
    schema.blocks.insert("ephemeral".into(), ephemeral);

    for name in ["variable", "output"] {
        patch_block(schema, name, |b| {
            b.body.attributes.insert(
                "ephemeral".into(),
                optional(typed(Type::Bool), "Whether the value is ephemeral"),
            );
        });
    }
}

/// A single absolute address such as `aws_instance.web`.
fn address() -> Constraint {
    Constraint::Reference {
        of_type: None,
        of_scope: None,
    }
}
