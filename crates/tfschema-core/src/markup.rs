//! Human-readable descriptions attached to schema nodes.

use serde::{Deserialize, Serialize};

/// How the text of a [`MarkupContent`] is to be rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupKind {
    /// No description at all.
    #[default]
    Nil,
    /// Plain text.
    #[serde(rename = "plaintext")]
    PlainText,
    /// Markdown.
    Markdown,
}

/// Description text together with its rendering kind.
///
/// # Invariants
///
/// An empty value always has kind [`MarkupKind::Nil`]; the constructors
/// normalise it so that "no description" has exactly one representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkupContent {
    /// Rendering kind.
    pub kind: MarkupKind,
    /// Raw text.
    pub value: String,
}

impl MarkupContent {
    /// Plain-text description.
    pub fn plain_text(value: impl Into<String>) -> Self {
        Self::with_kind(MarkupKind::PlainText, value.into())
    }

    /// Markdown description.
    pub fn markdown(value: impl Into<String>) -> Self {
        Self::with_kind(MarkupKind::Markdown, value.into())
    }

    /// Returns true when there is no description text.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn with_kind(kind: MarkupKind, value: String) -> Self {
        if value.is_empty() {
            return Self::default();
        }
        Self { kind, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_nil() {
        assert_eq!(MarkupContent::markdown(""), MarkupContent::default());
        assert_eq!(MarkupContent::plain_text("").kind, MarkupKind::Nil);
    }

    #[test]
    fn keeps_kind_for_text() {
        let md = MarkupContent::markdown("**bold**");
        assert_eq!(md.kind, MarkupKind::Markdown);
        assert!(!md.is_empty());
    }
}
