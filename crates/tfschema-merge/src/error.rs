//! # Error Types — Composition Errors
//!
//! Two layers: [`MergeError`] aborts a whole merge, [`LookupError`] is what a
//! [`StateReader`](crate::reader::StateReader) reports for one contributor.
//! Lookup errors never escape a merge; the contributor is logged and skipped.

use thiserror::Error;

use tfschema_core::{PluginAddr, SchemaKeyError};
use tfschema_versions::VersionError;

/// Fatal error of a merge call.
#[derive(Error, Debug)]
pub enum MergeError {
    /// The merger was asked to compose without a baseline schema.
    #[error("core schema required: no baseline was set on the merger")]
    CoreSchemaRequired,

    /// A dependent-body key could not be canonicalised.
    #[error("schema key error: {0}")]
    SchemaKey(#[from] SchemaKeyError),

    /// A versioned table has no entry for the merger's version.
    #[error("version error: {0}")]
    Version(#[from] VersionError),
}

/// Failure of a [`StateReader`](crate::reader::StateReader) lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The reader holds no schema for the plugin.
    #[error("no schema found for plugin {0}")]
    PluginNotFound(PluginAddr),

    /// The reader holds schemas for the plugin, but none satisfies the
    /// unit's version requirement.
    #[error("no schema for plugin {addr} satisfies {constraint}")]
    PluginVersionMismatch {
        /// The requested plugin.
        addr: PluginAddr,
        /// The unit's requirement.
        constraint: String,
    },

    /// No metadata has been harvested for the unit path.
    #[error("no metadata for unit {0:?}")]
    UnitNotFound(String),

    /// The backing store failed.
    #[error("state read failed: {0}")]
    Backend(String),
}
