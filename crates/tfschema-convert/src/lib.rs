//! # tfschema-convert — Wire Schema Converter
//!
//! Plugins describe their configuration, resource, data source and function
//! shapes in a JSON document. This crate decodes that document ([`wire`])
//! and converts it into the internal schema tree ([`convert`]).
//!
//! There is exactly one conversion path. Both the multi-plugin document and
//! single-plugin documents go through [`convert_plugin_schema`].
//!
//! ## Crate Policy
//!
//! - Depends only on `tfschema-core` among internal crates.
//! - A malformed document yields a [`ConvertError`]; it never panics and
//!   never yields a partially converted schema.

pub mod convert;
pub mod error;
pub mod wire;

pub use convert::{
    body_from_block, convert_function, convert_plugin_schema, parse_plugin_schema,
    parse_provider_schemas,
};
pub use error::ConvertError;
pub use wire::{ProviderSchemasDocument, WirePluginSchema};
