//! Individual validation checks.

pub mod datatype;
pub mod mapping;
pub mod range;
pub mod required;

use sales_model::{Mapping, Row, TargetField, TypedValue, ValidationError};

/// Check one raw cell against its target field.
///
/// Returns the typed value ([`TypedValue::Null`] for an empty optional
/// cell) or the first error found; at most one error per cell.
pub fn check_cell(
    row_index: usize,
    field: &TargetField,
    raw: &str,
) -> Result<TypedValue, ValidationError> {
    if raw.trim().is_empty() {
        return match required::check(row_index, field) {
            Some(error) => Err(error),
            None => Ok(TypedValue::Null),
        };
    }
    let value = datatype::check(row_index, field, raw)?;
    match range::check(row_index, field, &value) {
        Some(error) => Err(error),
        None => Ok(value),
    }
}

/// Run the per-cell checks for every mapped field of a row.
pub fn check_row(row: &Row, mapping: &Mapping, fields: &[TargetField]) -> Vec<ValidationError> {
    fields
        .iter()
        .filter_map(|field| {
            let source = mapping.source_for(&field.id)?;
            check_cell(row.index, field, row.value(source)).err()
        })
        .collect()
}
