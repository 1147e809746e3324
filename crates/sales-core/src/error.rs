//! Error types for import sessions.

use sales_ingest::IngestError;
use sales_map::MappingError;
use sales_model::ValidationError;
use sales_standards::StandardsError;
use thiserror::Error;

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    // === Wrapped Errors ===
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Standards(#[from] StandardsError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    // === Dataset Errors ===
    /// Externally supplied mapping entries failed their checks.
    #[error("mapping file is invalid: {}", summarize(.errors))]
    InvalidMappingConfig { errors: Vec<ValidationError> },

    #[error("row {index} does not exist; the file has {total} data rows")]
    RowOutOfRange { index: usize, total: usize },
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
