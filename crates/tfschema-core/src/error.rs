//! # Error Types — Schema Model Errors
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Each carries the offending input so diagnostics can
//! point at it without re-parsing.

use thiserror::Error;

/// Top-level error type for the schema model.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A type expression could not be decoded.
    #[error("type error: {0}")]
    Type(#[from] TypeError),

    /// A plugin address could not be parsed.
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// A schema key could not be canonicalised.
    #[error("schema key error: {0}")]
    SchemaKey(#[from] SchemaKeyError),
}

/// Error decoding the wire encoding of a type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A primitive type name that the language does not define.
    #[error("unknown primitive type {0:?}")]
    UnknownPrimitive(String),

    /// A collection/structural type tag that the language does not define.
    #[error("unknown type kind {0:?}")]
    UnknownKind(String),

    /// A structurally invalid type encoding.
    #[error("malformed type encoding: {0}")]
    Malformed(String),
}

/// Error parsing a canonical plugin address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The address has an unsupported number of segments.
    #[error("invalid plugin address {0:?}: expected [host/]namespace/type or type")]
    InvalidFormat(String),

    /// One of the segments is empty or contains invalid characters.
    #[error("invalid plugin address {address:?}: invalid segment {segment:?}")]
    InvalidSegment {
        /// The full address that was parsed.
        address: String,
        /// The offending segment.
        segment: String,
    },

    /// A local reference (`name` or `name.alias`) is malformed.
    #[error("invalid plugin reference {0:?}")]
    InvalidReference(String),
}

/// Error during canonical serialization of a schema key.
#[derive(Error, Debug)]
pub enum SchemaKeyError {
    /// JSON canonicalization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
