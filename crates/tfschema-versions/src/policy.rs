//! Policy and policy-test baselines.
//!
//! Policies (`*.policy.hcl`) enforce conditions over resources and plugin
//! configurations. Policy tests (`*.policytest.hcl`) describe the objects a
//! policy is evaluated against, together with the expected outcome.

use semver::Version;
use tfschema_core::{BlockSchema, BodySchema, LabelSchema, NestingMode, Type};

use crate::builder::{
    any, block, body, key_label, keywords, label, literal_string, optional, required, typed,
    BlockExt, BodyExt,
};
use crate::table::{TableEntry, VersionedTable};

static POLICY_ENTRIES: [TableEntry<BodySchema>; 2] = [
    TableEntry::base(Version::new(0, 1, 0), policy_base_0_1),
    TableEntry::patch(Version::new(0, 2, 0), policy_patch_0_2),
];

/// Policy baselines.
pub static POLICY_SCHEMAS: VersionedTable<BodySchema> =
    VersionedTable::new("policy", &POLICY_ENTRIES);

static POLICY_TEST_ENTRIES: [TableEntry<BodySchema>; 2] = [
    TableEntry::base(Version::new(0, 1, 0), policy_test_base_0_1),
    TableEntry::patch(Version::new(0, 2, 0), policy_test_patch_0_2),
];

/// Policy-test baselines.
pub static POLICY_TEST_SCHEMAS: VersionedTable<BodySchema> =
    VersionedTable::new("policy-test", &POLICY_TEST_ENTRIES);

fn locals() -> BlockSchema {
    block("Local values", vec![], body().any_attribute(optional(any(), "Local value")))
        .nesting(NestingMode::List)
}

fn enforce_block() -> BlockSchema {
    block(
        "A condition the policed object must satisfy",
        vec![],
        body()
            .attr("condition", required(typed(Type::Bool), "Condition that must hold"))
            .attr(
                "error_message",
                optional(typed(Type::String), "Message reported when the condition fails"),
            ),
    )
    .nesting(NestingMode::List)
}

fn policy_rule(description: &str, first_label: &str) -> BlockSchema {
    block(
        description,
        vec![
            key_label(first_label, "Policed type"),
            label("name", "Policy Name"),
        ],
        body()
            .attr(
                "enforcement_level",
                optional(keywords(&["advisory", "mandatory"]), "How strictly the policy is enforced"),
            )
            .attr("filter", optional(typed(Type::Bool), "Only evaluate objects for which this holds"))
            .block("locals", locals())
            .block("enforce", enforce_block()),
    )
    .nesting(NestingMode::List)
}

fn policy_base_0_1() -> BodySchema {
    let policy = block(
        "Settings of the policy set",
        vec![],
        body()
            .attr(
                "enforcement_level",
                optional(keywords(&["advisory", "mandatory"]), "Default enforcement level"),
            )
            .block(
                "required_providers",
                block(
                    "Providers whose schemas the policies are written against",
                    vec![],
                    body().any_attribute(optional(typed(Type::Dynamic), "Provider requirement")),
                )
                .at_most(1),
            ),
    )
    .at_most(1);

    body()
        .block("policy", policy)
        .block("resource_policy", policy_rule("Policy applied to every resource of a type", "type"))
        .block(
            "provider_policy",
            policy_rule("Policy applied to every configuration of a provider", "name"),
        )
        .block("locals", locals())
}

fn policy_patch_0_2(schema: &mut BodySchema) {
    schema.blocks.insert(
        "module_policy".into(),
        policy_rule("Policy applied to every call of a module source", "source"),
    );
}

fn test_subject(description: &str, labels: Vec<LabelSchema>) -> BlockSchema {
    block(
        description,
        labels,
        body()
            .attr("attrs", optional(typed(Type::Dynamic), "Attribute values of the object"))
            .attr(
                "expect_failure",
                optional(typed(Type::Bool), "Whether the policy is expected to fail"),
            )
            .attr("skip", optional(typed(Type::Bool), "Whether to skip this case")),
    )
    .nesting(NestingMode::List)
}

fn policy_test_base_0_1() -> BodySchema {
    body()
        .block(
            "resource",
            test_subject(
                "A resource the policies are evaluated against",
                vec![key_label("type", "Resource Type"), label("name", "Reference Name")],
            ),
        )
        .block(
            "provider",
            test_subject(
                "A provider configuration the policies are evaluated against",
                vec![key_label("name", "Provider name"), label("alias", "Configuration Alias")],
            ),
        )
}

fn policy_test_patch_0_2(schema: &mut BodySchema) {
    schema.blocks.insert(
        "data".into(),
        test_subject(
            "A data source the policies are evaluated against",
            vec![key_label("type", "Data Source Type"), label("name", "Reference Name")],
        ),
    );
    let mut module = test_subject(
        "A module call the policies are evaluated against",
        vec![label("source", "Module Source"), label("name", "Reference Name")],
    );
    module.body.attributes.insert(
        "version".into(),
        optional(literal_string(), "Module version the call pins"),
    );
    schema.blocks.insert("module".into(), module);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rules_are_keyed_on_first_label() {
        let schema = POLICY_SCHEMAS.get(&Version::new(0, 1, 0)).unwrap();
        assert!(schema.blocks["resource_policy"].labels[0].is_dep_key);
        assert!(schema.blocks["provider_policy"].labels[0].is_dep_key);
        assert!(!schema.blocks.contains_key("module_policy"));
        assert!(POLICY_SCHEMAS.latest().blocks.contains_key("module_policy"));
    }

    #[test]
    fn policy_test_subjects() {
        let base = POLICY_TEST_SCHEMAS.get(&Version::new(0, 1, 5)).unwrap();
        assert!(base.blocks.contains_key("resource"));
        assert!(!base.blocks.contains_key("data"));
        let latest = POLICY_TEST_SCHEMAS.latest();
        assert!(latest.blocks["data"].body.attributes.contains_key("attrs"));
        assert!(latest.blocks.contains_key("module"));
    }
}
