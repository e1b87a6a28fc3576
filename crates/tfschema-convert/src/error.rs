//! # Conversion Errors
//!
//! A conversion error aborts the one document being converted. Every
//! variant names the path of the offending element (`resource aws_instance
//! > ingress > from_port`) so the caller can report it without re-walking
//! the document.

use thiserror::Error;

use tfschema_core::{AddressError, TypeError};

/// Error converting a wire-format plugin schema.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("failed to decode plugin schema document: {0}")]
    Decode(#[from] serde_json::Error),

    /// An attribute declares neither or both of `type` and `nested_type`.
    #[error("invalid attribute at {path}: {reason}")]
    InvalidAttribute {
        /// Path of the attribute.
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A nesting mode contradicts its item bounds.
    #[error("inconsistent nesting at {path}: {reason}")]
    InconsistentNesting {
        /// Path of the nested block or attribute.
        path: String,
        /// What is inconsistent.
        reason: String,
    },

    /// A type expression could not be decoded.
    #[error("invalid type at {path}: {source}")]
    InvalidType {
        /// Path of the typed element.
        path: String,
        /// Underlying type error.
        #[source]
        source: TypeError,
    },

    /// A plugin address key could not be parsed.
    #[error("invalid plugin address: {0}")]
    InvalidAddress(#[from] AddressError),
}
