//! # tfschema-versions — Versioned Baselines and Version Resolution
//!
//! Every supported language release has a baseline schema: the blocks and
//! attributes of the configuration language itself, before any plugin
//! contributes anything. This crate holds those baselines and picks the
//! right one for a requested version or constraint.
//!
//! ## Key Design Principles
//!
//! 1. **Base-then-patch.** Each table starts from one base constructor and
//!    applies a small named patch per release. No release is a duplicated
//!    literal of its predecessor.
//!
//! 2. **Built once, shared read-only.** Tables are `static`. Each entry is
//!    memoised in a `OnceLock` the first time it is requested and handed out
//!    as `&'static`. Callers that attach content clone first.
//!
//! 3. **Resolution always lands on a table.** [`resolve_version`] returns a
//!    version inside the table's bounds or an error. It never returns a
//!    version without a baseline.
//!
//! ## Crate Policy
//!
//! - Depends only on `tfschema-core` among internal crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

mod builder;

pub mod backends;
pub mod builtin;
pub mod constraint;
pub mod error;
pub mod family;
pub mod functions;
pub mod module;
pub mod policy;
pub mod resolve;
pub mod stack;
pub mod table;
pub mod test_file;

// ─── Resolution ─────────────────────────────────────────────────────
pub use constraint::{core_of, parse_version, Constraints};
pub use error::VersionError;
pub use family::SchemaFamily;
pub use resolve::resolve_version;
pub use table::{Build, TableEntry, VersionedTable};

// ─── Tables ─────────────────────────────────────────────────────────
pub use backends::{BackendCatalog, BACKENDS};
pub use builtin::{builtin_addr, BUILTIN_LOCAL_NAME, BUILTIN_PLUGIN, REMOTE_STATE_DATA_SOURCE};
pub use functions::{FunctionTable, FUNCTIONS};

/// Re-exported so callers can name versions without a direct dependency.
pub use semver;
