//! Required value checks.
//!
//! Row level only: whether a required field is mapped at all is a dataset
//! level concern handled by [`super::mapping`].

use sales_model::{TargetField, ValidationError, ValidationErrorKind};

/// Check an empty cell of `field`.
pub fn check(row_index: usize, field: &TargetField) -> Option<ValidationError> {
    field.required.then(|| {
        ValidationError::row(
            row_index,
            &field.id,
            ValidationErrorKind::RequiredMissing,
            format!("Required field '{}' is empty", field.label),
        )
    })
}
