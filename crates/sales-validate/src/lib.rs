//! Row validation for sales imports.
//!
//! Validates rows against the current mapping and the target schema:
//!
//! - **Mapping checks**: required fields with no source column (reported
//!   once, at dataset level), entries naming unknown fields or columns
//! - **Required values**: required field empty in a row
//! - **Types**: dates, amounts, numbers, e-mail addresses and phone numbers
//!   must parse
//! - **Ranges**: numeric `min`/`max` bounds and the accepted date window
//!
//! Validation is pure: the same rows, mapping and fields always produce the
//! same report, and nothing is cached between calls. Run it on the preview
//! while the operator edits the mapping, and again on the full row set
//! before committing.
//!
//! # Example
//!
//! ```ignore
//! use sales_validate::validate;
//!
//! let report = validate(&rows, &mapping, registry.fields());
//! for error in report.dataset_errors() {
//!     eprintln!("{error}");
//! }
//! println!("{} of {} rows valid", report.valid_count(), report.total());
//! ```

mod checks;
mod record;
mod report;

use sales_model::{Mapping, MappingConfig, Row, SourceColumn, TargetField, ValidationError};

pub use record::{CommitRecord, coerce_row};
pub use report::ValidationReport;

/// Validate rows against a mapping.
///
/// Source columns are taken from the rows themselves; use
/// [`validate_with_columns`] when the header list is known, so that mapping
/// entries naming absent columns are caught even when `rows` is empty.
pub fn validate(rows: &[Row], mapping: &Mapping, fields: &[TargetField]) -> ValidationReport {
    validate_with_columns(rows, None, mapping, fields)
}

/// Validate rows against a mapping and the file's header list.
///
/// Runs, in order:
/// - dataset-level mapping checks (fields in declaration order)
/// - per-row checks (rows in input order, fields in declaration order)
pub fn validate_with_columns(
    rows: &[Row],
    columns: Option<&[SourceColumn]>,
    mapping: &Mapping,
    fields: &[TargetField],
) -> ValidationReport {
    let mut report = ValidationReport::new(rows.iter().map(|row| row.index));

    let known_column = |name: &str| match columns {
        Some(columns) => columns.iter().any(|c| c.as_str() == name),
        // Every row carries every header, so the first one is enough.
        None => rows.first().is_none_or(|row| row.cells.contains_key(name)),
    };
    report.extend(checks::mapping::check(mapping, fields, known_column));

    for row in rows {
        report.extend(checks::check_row(row, mapping, fields));
    }

    tracing::debug!(
        rows = report.total(),
        invalid = report.invalid_count(),
        dataset_errors = report.dataset_errors().count(),
        "validated rows"
    );
    report
}

/// Check externally supplied mapping entries before they are applied.
///
/// Reports `duplicate_mapping` for every target claimed by more than one
/// source, and `general` for entries naming unknown fields.
pub fn validate_mapping_config(
    config: &MappingConfig,
    fields: &[TargetField],
) -> Vec<ValidationError> {
    checks::mapping::check_config(config, fields)
}
