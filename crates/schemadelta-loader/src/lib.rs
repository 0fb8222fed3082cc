//! Schema loading
//!
//! This crate handles:
//! - Parsing ECJson-style schema files into the core model
//! - Locating referenced schemas on search paths
//! - Caching loaded schemas in a [`SchemaContext`]

pub mod error;
pub mod context;
pub mod json;
pub mod loader;

pub use error::LoadError;
pub use context::SchemaContext;
pub use loader::SchemaLoader;
