//! # tfschema-merge — Schema Composition
//!
//! Turns a static, version-specific baseline into the schema of one
//! concrete configuration unit by attaching *dependent bodies*: plugin
//! shapes keyed by the labels and attribute expressions that select them,
//! remote-state backend arguments, and the reference targets of child units.
//!
//! ## Key Design Principles
//!
//! 1. **Copy, then attach.** Every merge starts from a deep copy of the
//!    baseline. The shared baseline is never mutated, so merges are
//!    idempotent and safe to run concurrently.
//!
//! 2. **One lookup per plugin.** References are grouped by canonical plugin
//!    address; each plugin is resolved once through the [`StateReader`] and
//!    registered under every local name and alias that points at it.
//!
//! 3. **Failed contributors are omitted, not fatal.** A plugin or child unit
//!    the reader cannot supply is logged at `warn` and left out. Only a
//!    missing baseline aborts a merge.
//!
//! ## Crate Policy
//!
//! - Depends on `tfschema-core` and `tfschema-versions` only.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

mod compose;

pub mod error;
pub mod functions;
pub mod meta;
pub mod module;
pub mod policy;
pub mod reader;
pub mod reference;
pub mod stack;
pub mod test_file;

// ─── Mergers ────────────────────────────────────────────────────────
pub use functions::{FunctionsMerger, PLUGIN_FUNCTIONS_SINCE};
pub use module::ModuleSchemaMerger;
pub use policy::PolicySchemaMerger;
pub use stack::StackSchemaMerger;
pub use test_file::{TestKind, TestSchemaMerger};

// ─── Inputs ─────────────────────────────────────────────────────────
pub use error::{LookupError, MergeError};
pub use meta::{Output, UnitCall, UnitMeta, Variable};
pub use reader::{MemoryStateReader, StateReader};
pub use reference::{ReferenceTargetBuilder, ReferenceTargets};
