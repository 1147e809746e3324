//! Mapping editor state.
//!
//! Tracks the operator's current (possibly partial) mapping between the
//! columns of one source file and the target schema.

use std::fmt;

use sales_model::{Mapping, MappingConfig, SourceColumn, TargetField};
use serde::{Deserialize, Serialize};

use crate::engine::MappingResult;
use crate::error::MappingError;

/// Coarse progress indicator for display; never gates anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    /// Nothing mapped.
    Empty,
    /// Less than half of the target fields mapped.
    Partial,
    /// At least half, but not all, target fields mapped.
    Good,
    /// Every target field mapped.
    Complete,
}

impl CompletionStatus {
    /// Status for `mapped` out of `total` target fields.
    pub fn from_counts(mapped: usize, total: usize) -> Self {
        if mapped == 0 || total == 0 {
            return Self::Empty;
        }
        let ratio = mapped as f64 / total as f64;
        if ratio < 0.5 {
            Self::Partial
        } else if ratio < 1.0 {
            Self::Good
        } else {
            Self::Complete
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Partial => "partial",
            Self::Good => "good",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of mapping counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    /// Total number of target fields.
    pub total_fields: usize,
    /// Number of mapped target fields.
    pub mapped: usize,
    /// Total required fields.
    pub required_total: usize,
    /// Required fields that are mapped.
    pub required_mapped: usize,
    /// Source columns without a target, in header order.
    pub unmapped_columns: Vec<String>,
    /// Target fields without a source, in declaration order.
    pub available_fields: Vec<String>,
    pub status: CompletionStatus,
}

/// Editable mapping over a fixed set of source columns and target fields.
///
/// The editor is the sole writer of its [`Mapping`]. Every mutation keeps
/// the one-source-per-target invariant: mapping a second source onto a
/// target silently unmaps the first.
#[derive(Debug, Clone)]
pub struct MappingEditor {
    columns: Vec<SourceColumn>,
    fields: Vec<TargetField>,
    mapping: Mapping,
}

impl MappingEditor {
    /// Create an editor with an empty mapping.
    pub fn new(columns: Vec<SourceColumn>, fields: Vec<TargetField>) -> Self {
        Self {
            columns,
            fields,
            mapping: Mapping::new(),
        }
    }

    pub fn columns(&self) -> &[SourceColumn] {
        &self.columns
    }

    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.as_str() == column)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.id == field)
    }

    /// Point `source` at `target`.
    ///
    /// A different source previously mapped to `target` is unmapped and
    /// returned. The previous target of `source`, if any, is released.
    pub fn map(&mut self, source: &str, target: &str) -> Result<Option<String>, MappingError> {
        if !self.has_column(source) {
            return Err(MappingError::ColumnNotFound(source.to_string()));
        }
        if !self.has_field(target) {
            return Err(MappingError::FieldNotFound(target.to_string()));
        }
        let displaced = self.mapping.assign(source, target);
        if let Some(previous) = &displaced {
            tracing::debug!(
                source,
                target,
                displaced = %previous,
                "re-parented target field"
            );
        }
        Ok(displaced)
    }

    /// Remove the entry for `source`; no-op if it is not mapped.
    ///
    /// Returns the target it pointed at.
    pub fn unmap(&mut self, source: &str) -> Option<String> {
        self.mapping.remove(source)
    }

    /// Clear the mapping.
    pub fn reset(&mut self) {
        self.mapping.clear();
    }

    /// Replace the mapping with auto-mapper output.
    ///
    /// Entries naming unknown columns or fields are dropped.
    pub fn apply_suggestions(&mut self, mapping: Mapping) {
        self.mapping.clear();
        for (source, target) in mapping.iter() {
            if self.has_column(source) && self.has_field(target) {
                self.mapping.assign(source, target);
            } else {
                tracing::debug!(source, target, "dropped suggestion outside the schema");
            }
        }
    }

    /// Replace the mapping with an auto-mapper result.
    pub fn apply_result(&mut self, result: &MappingResult) {
        self.apply_suggestions(result.to_mapping());
    }

    /// Replace the mapping with externally supplied entries.
    ///
    /// Entries are applied in source-name order through [`Self::map`], so a
    /// target named twice ends up with the later source. Unknown columns or
    /// fields abort without changing the current mapping.
    pub fn apply_config(&mut self, config: &MappingConfig) -> Result<(), MappingError> {
        let mut next = self.clone();
        next.reset();
        for (source, target) in &config.entries {
            next.map(source, target)?;
        }
        self.mapping = next.mapping;
        Ok(())
    }

    /// Progress indicator from mapped fields over total fields.
    pub fn completion_status(&self) -> CompletionStatus {
        CompletionStatus::from_counts(self.mapping.len(), self.fields.len())
    }

    /// Required fields with no mapped source.
    pub fn unmapped_required(&self) -> Vec<&TargetField> {
        self.fields
            .iter()
            .filter(|f| f.required && !self.mapping.is_target_mapped(&f.id))
            .collect()
    }

    /// Get summary counts.
    pub fn summary(&self) -> MappingSummary {
        let required_total = self.fields.iter().filter(|f| f.required).count();
        let required_mapped = self
            .fields
            .iter()
            .filter(|f| f.required && self.mapping.is_target_mapped(&f.id))
            .count();

        MappingSummary {
            total_fields: self.fields.len(),
            mapped: self.mapping.len(),
            required_total,
            required_mapped,
            unmapped_columns: self
                .columns
                .iter()
                .filter(|c| !self.mapping.is_source_mapped(c.as_str()))
                .map(ToString::to_string)
                .collect(),
            available_fields: self
                .fields
                .iter()
                .filter(|f| !self.mapping.is_target_mapped(&f.id))
                .map(|f| f.id.clone())
                .collect(),
            status: self.completion_status(),
        }
    }
}
