//! # Version Errors
//!
//! Every variant carries the offending text so the caller can report
//! exactly which version or constraint could not be honoured.

use thiserror::Error;

/// Error selecting a versioned baseline schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// No registered schema satisfies the requested version and constraint.
    #[error(
        "no compatible {family} schema for version {} and constraint {}",
        .version.as_deref().unwrap_or("(none)"),
        .constraint.as_deref().unwrap_or("(none)")
    )]
    NoCompatibleSchema {
        /// Schema family that was searched.
        family: String,
        /// The requested version, if any.
        version: Option<String>,
        /// The requested constraint, if any.
        constraint: Option<String>,
    },

    /// A version string could not be parsed.
    #[error("invalid version {0:?}")]
    InvalidVersion(String),

    /// A constraint string could not be parsed.
    #[error("invalid version constraint {constraint:?}: {reason}")]
    InvalidConstraint {
        /// The full constraint text.
        constraint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A schema family name is not known.
    #[error("unknown schema family {0:?}")]
    UnknownFamily(String),
}
