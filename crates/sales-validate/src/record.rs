//! Typed records handed to the commit sink.

use std::collections::BTreeMap;

use sales_model::{Mapping, Row, TargetField, TypedValue, ValidationError, ValidationErrorKind};
use serde::Serialize;

use crate::checks;

/// One row converted to target field values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitRecord {
    pub row_index: usize,
    /// Every target field by id; unmapped or empty optional fields are
    /// [`TypedValue::Null`].
    pub values: BTreeMap<String, TypedValue>,
}

impl CommitRecord {
    pub fn get(&self, field_id: &str) -> Option<&TypedValue> {
        self.values.get(field_id)
    }
}

/// Convert a row into a [`CommitRecord`], re-running every check.
///
/// Unlike [`crate::validate`] a required field with no source is reported
/// against this row, so a record is only produced when it is complete.
pub fn coerce_row(
    row: &Row,
    mapping: &Mapping,
    fields: &[TargetField],
) -> Result<CommitRecord, Vec<ValidationError>> {
    let mut values = BTreeMap::new();
    let mut errors = Vec::new();

    for field in fields {
        let Some(source) = mapping.source_for(&field.id) else {
            if field.required {
                errors.push(ValidationError::row(
                    row.index,
                    &field.id,
                    ValidationErrorKind::RequiredMissing,
                    format!("Required field '{}' is not mapped", field.label),
                ));
            } else {
                values.insert(field.id.clone(), TypedValue::Null);
            }
            continue;
        };
        match checks::check_cell(row.index, field, row.value(source)) {
            Ok(value) => {
                values.insert(field.id.clone(), value);
            }
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        Ok(CommitRecord {
            row_index: row.index,
            values,
        })
    } else {
        Err(errors)
    }
}
