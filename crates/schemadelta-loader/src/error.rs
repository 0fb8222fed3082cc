//! Schema loading errors

/// Errors that abort a schema load. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The schema file or one of its references could not be located
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    /// The input is not a readable schema
    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("Failed to read schema file {path}: {message}")]
    Io { path: String, message: String },

    /// A schema with the same name is already loaded in the context
    #[error("Schema '{0}' is already loaded in this context")]
    DuplicateSchema(String),
}
