//! Validation error values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Required field unmapped (dataset level) or empty (row level).
    RequiredMissing,
    /// Value does not parse as the field's type.
    TypeMismatch,
    /// Value parses but lies outside the accepted range.
    OutOfRange,
    /// Two source columns claim the same target field.
    DuplicateMapping,
    /// Anything else, e.g. a mapping entry naming an unknown field.
    General,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredMissing => "required_missing",
            Self::TypeMismatch => "type_mismatch",
            Self::OutOfRange => "out_of_range",
            Self::DuplicateMapping => "duplicate_mapping",
            Self::General => "general",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding.
///
/// `row_index` is `None` for dataset-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub row_index: Option<usize>,
    pub target_field_id: Option<String>,
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn dataset(
        target_field_id: Option<&str>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row_index: None,
            target_field_id: target_field_id.map(str::to_string),
            kind,
            message: message.into(),
        }
    }

    pub fn row(
        row_index: usize,
        target_field_id: &str,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row_index: Some(row_index),
            target_field_id: Some(target_field_id.to_string()),
            kind,
            message: message.into(),
        }
    }

    pub fn is_dataset_level(&self) -> bool {
        self.row_index.is_none()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row_index {
            Some(row) => write!(f, "row {row}: [{}] {}", self.kind, self.message),
            None => write!(f, "dataset: [{}] {}", self.kind, self.message),
        }
    }
}
