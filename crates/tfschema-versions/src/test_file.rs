//! Test-file baselines (`*.tftest.hcl`).

use semver::Version;
use tfschema_core::{BlockSchema, BodySchema, Constraint, NestingMode, Type};

use crate::builder::{
    any, block, body, condition_block, key_label, keywords, label, literal_string, optional,
    patch_block, provider_map, reference_list, required, typed, BlockExt, BodyExt,
};
use crate::table::{TableEntry, VersionedTable};

static ENTRIES: [TableEntry<BodySchema>; 3] = [
    TableEntry::base(Version::new(1, 6, 0), base_1_6),
    TableEntry::patch(Version::new(1, 7, 0), patch_1_7),
    TableEntry::patch(Version::new(1, 9, 0), patch_1_9),
];

/// Test-file baselines.
pub static TEST_SCHEMAS: VersionedTable<BodySchema> = VersionedTable::new("test", &ENTRIES);

fn variables_block() -> BlockSchema {
    block(
        "Input variable values for the module under test",
        vec![],
        body().any_attribute(optional(any(), "Variable value")),
    )
    .at_most(1)
}

fn base_1_6() -> BodySchema {
    let run = block(
        "A run block executes a plan or apply against the module under test",
        vec![label("name", "Run Name")],
        body()
            .attr(
                "command",
                optional(keywords(&["apply", "plan"]), "Whether to create real infrastructure or only plan"),
            )
            .attr("providers", optional(provider_map(), "Provider configurations passed to the module"))
            .attr(
                "expect_failures",
                optional(reference_list(), "Checkable objects expected to fail"),
            )
            .block("variables", variables_block())
            .block(
                "module",
                block(
                    "Alternate module to execute in this run",
                    vec![],
                    body()
                        .attr("source", required(literal_string(), "Module source address"))
                        .attr("version", optional(literal_string(), "Module version constraint")),
                )
                .at_most(1),
            )
            .block(
                "plan_options",
                block(
                    "Options controlling the plan of this run",
                    vec![],
                    body()
                        .attr("mode", optional(keywords(&["normal", "refresh-only"]), "Planning mode"))
                        .attr("refresh", optional(typed(Type::Bool), "Whether to refresh state first"))
                        .attr("replace", optional(reference_list(), "Resources to force-replace"))
                        .attr("target", optional(reference_list(), "Resources to target")),
                )
                .at_most(1),
            )
            .block("assert", condition_block("Assertion checked after the run")),
    )
    .nesting(NestingMode::List);

    let provider = block(
        "Provider configuration used by the test",
        vec![key_label("name", "Provider name")],
        body().attr("alias", optional(literal_string(), "Alias of this configuration")),
    )
    .nesting(NestingMode::List);

    body()
        .block("run", run)
        .block("variables", variables_block())
        .block("provider", provider)
}

fn override_block(description: &str, payload: &str) -> BlockSchema {
    block(
        description,
        vec![],
        body()
            .attr(
                "target",
                required(
                    Constraint::Reference {
                        of_type: None,
                        of_scope: None,
                    },
                    "Address of the overridden object",
                ),
            )
            .attr(payload, optional(typed(Type::Dynamic), "Values returned instead of real ones")),
    )
    .nesting(NestingMode::List)
}

fn overrides(host: BodySchema) -> BodySchema {
    host.block("override_resource", override_block("Override a resource", "values"))
        .block("override_data", override_block("Override a data source", "values"))
        .block("override_module", override_block("Override a module call", "outputs"))
}

fn patch_1_7(schema: &mut BodySchema) {
    let mock = |description: &str| {
        block(
            description,
            vec![key_label("type", "Type name")],
            body().attr("defaults", optional(typed(Type::Dynamic), "Default attribute values")),
        )
        .nesting(NestingMode::List)
    };
    let mock_provider = block(
        "A provider whose resources and data sources return generated values",
        vec![key_label("name", "Provider name")],
        overrides(
            body()
                .attr("alias", optional(literal_string(), "Alias of this configuration"))
                .attr("source", optional(literal_string(), "Directory with shared mock data"))
                .block("mock_resource", mock("Mocked values for a resource type"))
                .block("mock_data", mock("Mocked values for a data source type")),
        ),
    )
    .nesting(NestingMode::List);

    let root = std::mem::take(schema);
    *schema = overrides(root).block("mock_provider", mock_provider);
    patch_block(schema, "run", |run| {
        run.body = overrides(std::mem::take(&mut run.body));
    });
}

fn patch_1_9(schema: &mut BodySchema) {
    patch_block(schema, "run", |run| {
        run.body.attributes.insert(
            "state_key".into(),
            optional(literal_string(), "Key of the state file this run shares with other runs"),
        );
    });
}
