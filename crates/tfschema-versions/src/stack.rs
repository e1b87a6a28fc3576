//! Stack baselines (`*.tfstack.hcl`).

use semver::Version;
use tfschema_core::{AttributeSchema, BlockSchema, BodySchema, Constraint, NestingMode, Type};

use crate::builder::{
    any, block, body, key_label, label, literal_string, optional, provider_map, reference_list,
    required, typed, AttributeExt, BlockExt, BodyExt,
};
use crate::table::{TableEntry, VersionedTable};

static ENTRIES: [TableEntry<BodySchema>; 2] = [
    TableEntry::base(Version::new(1, 9, 0), base_1_9),
    TableEntry::patch(Version::new(1, 10, 0), patch_1_10),
];

/// Stack baselines.
pub static STACK_SCHEMAS: VersionedTable<BodySchema> = VersionedTable::new("stack", &ENTRIES);

fn for_each() -> AttributeSchema {
    optional(
        Constraint::OneOf(vec![
            typed(Type::map(Type::Dynamic)),
            typed(Type::set(Type::String)),
        ]),
        "A map or set of strings creating one instance per element",
    )
}

fn embedding(description: &str) -> BlockSchema {
    block(
        description,
        vec![key_label("name", "Reference Name")],
        body()
            .attr("source", required(literal_string(), "Source address of the configuration").dep_key())
            .attr("version", optional(literal_string(), "Version constraint of the source"))
            .attr("inputs", optional(typed(Type::Dynamic), "Input variable values"))
            .attr("for_each", for_each())
            .attr("depends_on", optional(reference_list(), "Set of references to hidden dependencies")),
    )
    .nesting(NestingMode::List)
}

fn base_1_9() -> BodySchema {
    let component = {
        let mut component = embedding("A component is one module instantiated inside the stack");
        component.body.attributes.insert(
            "providers".into(),
            optional(provider_map(), "Provider configurations passed to the component"),
        );
        component
    };

    let provider = block(
        "Provider configuration for components of the stack",
        vec![
            key_label("type", "Provider local name"),
            label("name", "Configuration Name"),
        ],
        body()
            .attr("for_each", for_each())
            .block("config", block("Provider configuration arguments", vec![], body()).at_most(1)),
    )
    .nesting(NestingMode::List);

    let required_providers = block(
        "Providers required by the stack",
        vec![],
        body().any_attribute(optional(typed(Type::Dynamic), "Provider source and version requirement")),
    )
    .at_most(1);

    let variable = block(
        "Input variable of the stack",
        vec![label("name", "Variable Name")],
        body()
            .attr("type", required(Constraint::TypeDeclaration, "Type constraint of the variable"))
            .attr("default", optional(any(), "Default value"))
            .attr("description", optional(literal_string(), "Description of the variable"))
            .attr("sensitive", optional(typed(Type::Bool), "Whether the value is sensitive"))
            .attr("nullable", optional(typed(Type::Bool), "Whether the value may be null"))
            .attr("ephemeral", optional(typed(Type::Bool), "Whether the value is ephemeral")),
    )
    .nesting(NestingMode::List);

    let output = block(
        "Output value of the stack",
        vec![label("name", "Output Name")],
        body()
            .attr("type", required(Constraint::TypeDeclaration, "Type constraint of the output"))
            .attr("value", required(any(), "Output value"))
            .attr("description", optional(literal_string(), "Description of the output"))
            .attr("sensitive", optional(typed(Type::Bool), "Whether the value is sensitive"))
            .attr("ephemeral", optional(typed(Type::Bool), "Whether the value is ephemeral")),
    )
    .nesting(NestingMode::List);

    body()
        .block("component", component)
        .block("provider", provider)
        .block("required_providers", required_providers)
        .block("variable", variable)
        .block("output", output)
        .block(
            "locals",
            block("Local values", vec![], body().any_attribute(optional(any(), "Local value")))
                .nesting(NestingMode::List),
        )
}

fn patch_1_10(schema: &mut BodySchema) {
    schema
        .blocks
        .insert("stack".into(), embedding("Embeds another stack inside this one"));
    let removed = block(
        "Declares that a component was removed from the stack",
        vec![],
        body()
            .attr(
                "from",
                required(
                    Constraint::Reference {
                        of_type: None,
                        of_scope: None,
                    },
                    "Address of the removed component",
                ),
            )
            .attr("source", required(literal_string(), "Source address of the removed component"))
            .attr("providers", optional(provider_map(), "Provider configurations needed to destroy it")),
    )
    .nesting(NestingMode::List);
    schema.blocks.insert("removed".into(), removed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_and_provider_shapes() {
        let schema = STACK_SCHEMAS.get(&Version::new(1, 9, 0)).unwrap();
        let component = &schema.blocks["component"];
        assert!(component.body.attributes["source"].is_dep_key);
        assert!(component.body.attributes.contains_key("inputs"));
        let provider = &schema.blocks["provider"];
        assert_eq!(provider.labels.len(), 2);
        assert!(provider.body.blocks.contains_key("config"));
        assert!(!schema.blocks.contains_key("stack"));
    }

    #[test]
    fn embedding_arrives_in_1_10() {
        let schema = STACK_SCHEMAS.latest();
        assert!(schema.blocks.contains_key("stack"));
        assert!(schema.blocks.contains_key("removed"));
    }
}
