//! Validation report for one pass over a set of rows.

use std::collections::{BTreeMap, BTreeSet};

use sales_model::{ValidationError, ValidationErrorKind};
use serde::Serialize;

/// Errors from one validation pass plus the rows they were computed over.
///
/// Counts are derived from the errors on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
    rows: BTreeSet<usize>,
}

impl ValidationReport {
    /// Create an empty report over the given row indices.
    pub fn new(rows: impl IntoIterator<Item = usize>) -> Self {
        Self {
            errors: Vec::new(),
            rows: rows.into_iter().collect(),
        }
    }

    pub(crate) fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    /// All errors: dataset-level first, then rows in input order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of rows validated.
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    /// Rows with no row-level errors.
    pub fn valid_count(&self) -> usize {
        self.total() - self.invalid_count()
    }

    /// Rows with at least one row-level error.
    pub fn invalid_count(&self) -> usize {
        self.invalid_rows().len()
    }

    /// Whether `row_index` was validated and has no errors.
    pub fn is_row_valid(&self, row_index: usize) -> bool {
        self.rows.contains(&row_index) && self.errors_for_row(row_index).next().is_none()
    }

    pub fn errors_for_row(&self, row_index: usize) -> impl Iterator<Item = &ValidationError> {
        self.errors
            .iter()
            .filter(move |e| e.row_index == Some(row_index))
    }

    pub fn dataset_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(|e| e.is_dataset_level())
    }

    pub fn has_dataset_errors(&self) -> bool {
        self.dataset_errors().next().is_some()
    }

    /// Indices of rows with at least one error, ascending.
    pub fn invalid_rows(&self) -> BTreeSet<usize> {
        self.errors.iter().filter_map(|e| e.row_index).collect()
    }

    /// Indices of rows with no errors, ascending.
    pub fn valid_rows(&self) -> BTreeSet<usize> {
        let invalid = self.invalid_rows();
        self.rows.difference(&invalid).copied().collect()
    }

    /// Rows that may be committed.
    ///
    /// Empty whenever the mapping itself is broken (for example a required
    /// field is unmapped), since no row can produce a complete record then.
    pub fn committable_rows(&self) -> BTreeSet<usize> {
        if self.has_dataset_errors() {
            BTreeSet::new()
        } else {
            self.valid_rows()
        }
    }

    /// Number of errors per kind.
    pub fn counts_by_kind(&self) -> BTreeMap<ValidationErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for error in &self.errors {
            *counts.entry(error.kind).or_insert(0) += 1;
        }
        counts
    }
}
