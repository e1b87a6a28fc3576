//! # tfschema-core — Schema Model
//!
//! This crate defines the vocabulary every other `tfschema-*` crate speaks:
//! the configuration language's type system, the constraint-expression tree
//! that describes which expressions are valid for an attribute, and the
//! body/block/attribute schema tree itself.
//!
//! ## Key Design Principles
//!
//! 1. **Owned trees, no sharing.** Schema trees own all of their children.
//!    `Clone` is therefore a full recursive deep copy, which is exactly what
//!    the mergers rely on when they copy a shared baseline before attaching
//!    conditional content.
//!
//! 2. **`SchemaKey` is canonical by construction.** The only constructor
//!    sorts and de-duplicates the condition set and serializes it through
//!    JSON Canonicalization Scheme. Two set-equal condition sets cannot
//!    produce different keys.
//!
//! 3. **Closed enums.** Nesting modes, markup kinds and constraint kinds are
//!    enums matched exhaustively. Adding a variant forces every conversion
//!    site to handle it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tfschema-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public model types derive `Debug`, `Clone`, `PartialEq` and `Serialize`.

pub mod address;
pub mod constraint;
pub mod error;
pub mod function;
pub mod markup;
pub mod plugin;
pub mod schema;
pub mod schema_key;
pub mod targetable;
pub mod types;

// Re-export primary types for ergonomic imports.
pub use address::{Address, IndexKey, Step};
pub use constraint::{Constraint, ObjectConstraint};
pub use error::{AddressError, SchemaError, SchemaKeyError, TypeError};
pub use function::{FunctionParameter, FunctionSignature};
pub use markup::{MarkupContent, MarkupKind};
pub use plugin::{PluginAddr, PluginRef, PluginSchema};
pub use schema::{
    AttributeSchema, BlockSchema, BodySchema, LabelSchema, NestingMode, PathTarget, SourcePos,
    SourceRange, Target, UnitPath,
};
pub use schema_key::{AttributeDependent, DependencyKeys, ExpressionValue, LabelDependent, SchemaKey};
pub use targetable::{sort_targetables, ScopeId, Targetable};
pub use types::Type;
