//! Error types for schema loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading a target schema.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StandardsError {
    /// Schema file not found.
    #[error("schema file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the schema file.
    #[error("failed to read schema file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a CSV record.
    #[error("failed to parse {file}: {message}")]
    CsvParse { file: String, message: String },

    /// A field row has an empty id.
    #[error("field on line {line} of {file} has an empty id")]
    EmptyFieldId { file: String, line: u64 },

    /// Two rows declare the same field id.
    #[error("duplicate field id '{id}' in {file}")]
    DuplicateField { id: String, file: String },

    /// Invalid value in a field column.
    #[error("invalid {field} value '{value}' for field '{id}' in {file}")]
    InvalidValue {
        field: &'static str,
        value: String,
        id: String,
        file: String,
    },

    /// The schema declares no fields at all.
    #[error("schema {file} declares no fields")]
    Empty { file: String },
}

/// Result type for schema loading operations.
pub type Result<T> = std::result::Result<T, StandardsError>;
