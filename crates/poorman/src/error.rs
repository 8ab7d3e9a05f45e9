//! Error types for schema acquisition and code generation.

use std::path::PathBuf;

use poorman_core::SchemaError;

/// Errors that can occur while generating model files.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The schema text could not be obtained.
    #[error("Schema unavailable from '{locator}': {reason}")]
    SchemaUnavailable {
        /// Database URL, database file or dump file.
        locator: String,
        /// Why retrieval failed.
        reason: String,
    },

    /// The schema text could not be parsed.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A template is missing, invalid, or references an unknown key.
    #[error("Template '{template}' failed for table '{table}': {message}")]
    Template {
        /// Template name.
        template: String,
        /// Table being rendered, empty while loading the template.
        table: String,
        /// Error message from the template engine.
        message: String,
    },

    /// A generated file could not be written.
    #[error("Failed to write '{path}': {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;
