//! Terse constructors for hand-written baseline schemas.

use tfschema_core::{
    AttributeSchema, BlockSchema, BodySchema, Constraint, LabelSchema, MarkupContent, NestingMode,
    ScopeId, Type,
};

/// An optional attribute.
pub(crate) fn optional(constraint: Constraint, description: &str) -> AttributeSchema {
    AttributeSchema {
        description: MarkupContent::markdown(description),
        is_optional: true,
        constraint,
        ..AttributeSchema::default()
    }
}

/// A required attribute.
pub(crate) fn required(constraint: Constraint, description: &str) -> AttributeSchema {
    AttributeSchema {
        description: MarkupContent::markdown(description),
        is_required: true,
        constraint,
        ..AttributeSchema::default()
    }
}

/// A computed, read-only attribute.
pub(crate) fn computed(ty: Type, description: &str) -> AttributeSchema {
    AttributeSchema {
        description: MarkupContent::markdown(description),
        is_computed: true,
        constraint: Constraint::for_type(&ty),
        ..AttributeSchema::default()
    }
}

/// Literal or reference of `ty`.
pub(crate) fn typed(ty: Type) -> Constraint {
    Constraint::for_type(&ty)
}

/// A bare literal string such as a module source address.
pub(crate) fn literal_string() -> Constraint {
    Constraint::LiteralType(Type::String)
}

/// Any expression of any type.
pub(crate) fn any() -> Constraint {
    Constraint::AnyExpression(Type::Dynamic)
}

/// One of the given keywords.
pub(crate) fn keywords(words: &[&str]) -> Constraint {
    Constraint::OneOf(words.iter().map(|w| Constraint::Keyword((*w).to_string())).collect())
}

/// A reference into `scope`, e.g. a plugin configuration.
pub(crate) fn reference(scope: &str) -> Constraint {
    Constraint::reference_into(ScopeId::new(scope))
}

/// A list of untyped references (`depends_on`, `ignore_changes`).
pub(crate) fn reference_list() -> Constraint {
    Constraint::Set {
        elem: Box::new(Constraint::Reference {
            of_type: None,
            of_scope: None,
        }),
        min_items: 0,
        max_items: 0,
    }
}

/// A map whose values reference plugin configurations.
pub(crate) fn provider_map() -> Constraint {
    Constraint::Map {
        elem: Box::new(reference(ScopeId::PROVIDER)),
    }
}

/// A plain label.
pub(crate) fn label(name: &str, description: &str) -> LabelSchema {
    LabelSchema {
        name: name.to_string(),
        description: MarkupContent::plain_text(description),
        ..LabelSchema::default()
    }
}

/// A label whose value selects dependent bodies.
pub(crate) fn key_label(name: &str, description: &str) -> LabelSchema {
    LabelSchema {
        is_dep_key: true,
        completable: true,
        ..label(name, description)
    }
}

/// A block with the given labels and body.
pub(crate) fn block(description: &str, labels: Vec<LabelSchema>, body: BodySchema) -> BlockSchema {
    BlockSchema {
        labels,
        body,
        description: MarkupContent::markdown(description),
        ..BlockSchema::default()
    }
}

/// Fluent modifiers for attributes.
pub(crate) trait AttributeExt {
    fn sensitive(self) -> Self;
    fn dep_key(self) -> Self;
    fn deprecated(self) -> Self;
}

impl AttributeExt for AttributeSchema {
    fn sensitive(mut self) -> Self {
        self.is_sensitive = true;
        self
    }

    fn dep_key(mut self) -> Self {
        self.is_dep_key = true;
        self
    }

    fn deprecated(mut self) -> Self {
        self.is_deprecated = true;
        self
    }
}

/// Fluent modifiers for blocks.
pub(crate) trait BlockExt {
    fn nesting(self, mode: NestingMode) -> Self;
    fn at_most(self, n: u64) -> Self;
}

impl BlockExt for BlockSchema {
    fn nesting(mut self, mode: NestingMode) -> Self {
        self.nesting = mode;
        self
    }

    fn at_most(mut self, n: u64) -> Self {
        self.max_items = n;
        self
    }
}

/// Fluent construction of bodies.
pub(crate) trait BodyExt {
    fn attr(self, name: &str, attr: AttributeSchema) -> Self;
    fn block(self, name: &str, block: BlockSchema) -> Self;
    fn any_attribute(self, attr: AttributeSchema) -> Self;
}

impl BodyExt for BodySchema {
    fn attr(mut self, name: &str, attr: AttributeSchema) -> Self {
        self.attributes.insert(name.to_string(), attr);
        self
    }

    fn block(mut self, name: &str, block: BlockSchema) -> Self {
        self.blocks.insert(name.to_string(), block);
        self
    }

    fn any_attribute(mut self, attr: AttributeSchema) -> Self {
        self.any_attribute = Some(Box::new(attr));
        self
    }
}

/// Shorthand for an empty body.
pub(crate) fn body() -> BodySchema {
    BodySchema::default()
}

/// Apply `f` to the named block of a baseline. A missing block leaves the
/// schema unchanged.
pub(crate) fn patch_block(schema: &mut BodySchema, name: &str, f: impl FnOnce(&mut BlockSchema)) {
    match schema.blocks.get_mut(name) {
        Some(block) => f(block),
        None => tracing::warn!(block = name, "patch target block missing from baseline"),
    }
}

/// The shared `lifecycle` block of resource-like blocks.
pub(crate) fn lifecycle() -> BlockSchema {
    block(
        "Lifecycle customizations that change default resource behaviours during apply",
        vec![],
        body()
            .attr(
                "create_before_destroy",
                optional(typed(Type::Bool), "Whether to create the replacement object before destroying the original"),
            )
            .attr(
                "prevent_destroy",
                optional(typed(Type::Bool), "Whether to reject any plan that would destroy this object"),
            )
            .attr(
                "ignore_changes",
                optional(
                    Constraint::OneOf(vec![Constraint::Keyword("all".into()), reference_list()]),
                    "Attributes whose changes are ignored when planning updates",
                ),
            ),
    )
    .at_most(1)
}

/// A `precondition`/`postcondition`/`assert` style check block.
pub(crate) fn condition_block(description: &str) -> BlockSchema {
    block(
        description,
        vec![],
        body()
            .attr("condition", required(typed(Type::Bool), "Condition that must hold"))
            .attr(
                "error_message",
                required(typed(Type::String), "Error message returned when the condition fails"),
            ),
    )
    .nesting(NestingMode::List)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_labels_are_completable() {
        let l = key_label("type", "Resource type");
        assert!(l.is_dep_key && l.completable);
        assert!(!label("name", "Name").is_dep_key);
    }

    #[test]
    fn patch_of_missing_block_is_noop() {
        let mut schema = body().block("a", block("", vec![], body()));
        let before = schema.clone();
        patch_block(&mut schema, "missing", |b| b.max_items = 3);
        assert_eq!(schema, before);
        patch_block(&mut schema, "a", |b| b.max_items = 3);
        assert_eq!(schema.blocks["a"].max_items, 3);
    }
}
