//! Error types for mapping operations.

use thiserror::Error;

/// Errors from mapping edits.
///
/// Pointing two sources at one target is never an error: the editor
/// re-parents the target instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MappingError {
    /// Target field not declared in the schema.
    #[error("Target field not found: {0}")]
    FieldNotFound(String),

    /// Column not present in the source file.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

impl MappingError {
    /// Get the target field id associated with this error, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldNotFound(field) => Some(field),
            Self::ColumnNotFound(_) => None,
        }
    }

    /// Get the column name associated with this error, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::ColumnNotFound(column) => Some(column),
            Self::FieldNotFound(_) => None,
        }
    }
}
