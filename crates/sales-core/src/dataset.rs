//! The import session aggregate.

use std::collections::BTreeSet;
use std::path::Path;

use sales_commit::CommitRequest;
use sales_ingest::{ParseOptions, ParsedTable, parse_path};
use sales_map::{AutoMapper, MappingEditor, MappingResult, MappingSummary};
use sales_model::{
    ColumnProfile, Mapping, MappingConfig, Row, SourceColumn, TargetField, ValidationError,
};
use sales_standards::SchemaRegistry;
use sales_validate::{ValidationReport, validate_mapping_config, validate_with_columns};

use crate::error::{CoreError, Result};

/// Rows a commit will include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSelection {
    /// Every row that validates, minus the rows deselected.
    AllValid { excluded: BTreeSet<usize> },
    /// Exactly these rows, valid or not. Empty commits nothing.
    Rows(BTreeSet<usize>),
}

impl Default for RowSelection {
    fn default() -> Self {
        Self::AllValid {
            excluded: BTreeSet::new(),
        }
    }
}

impl RowSelection {
    /// Whether the operator picked rows explicitly.
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Rows(_))
    }

    /// The explicitly chosen rows, if any.
    pub fn rows(&self) -> Option<&BTreeSet<usize>> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::AllValid { .. } => None,
        }
    }
}

/// One file being imported: its preview, the mapping and the row selection.
///
/// # Design Notes
///
/// - **The editor owns the mapping.** All edits go through it, so the
///   one-source-per-target invariant holds at all times.
/// - **Validation is derived.** Every edit re-runs the validator over the
///   preview rows and replaces the report; nothing else writes errors.
/// - **Commit reads a snapshot.** [`Dataset::commit_request`] copies the
///   mapping and selection, so later edits never affect a running commit.
/// - **An explicit selection stays explicit.** Deselecting the last chosen
///   row leaves an empty [`RowSelection::Rows`], which commits nothing; only
///   [`Dataset::clear_selection`] goes back to every valid row.
///
/// # Example
///
/// ```ignore
/// let mut dataset = Dataset::open(path, &ParseOptions::default(), &registry)?;
/// dataset.auto_detect(&AutoMapper::default());
/// dataset.map("Sold On", "date")?;
/// println!("{} invalid preview rows", dataset.validation().invalid_count());
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    preview_rows: Vec<Row>,
    total_row_count: usize,
    profiles: Vec<ColumnProfile>,
    fingerprint: String,
    editor: MappingEditor,
    validation: ValidationReport,
    selection: RowSelection,
    suggestions: Option<MappingResult>,
}

impl Dataset {
    /// Start a session over a parsed file with an empty mapping.
    pub fn new(table: ParsedTable, registry: &SchemaRegistry) -> Self {
        let editor = MappingEditor::new(table.headers, registry.fields().to_vec());
        let mut dataset = Self {
            preview_rows: table.preview_rows,
            total_row_count: table.total_row_count,
            profiles: table.profiles,
            fingerprint: table.fingerprint,
            editor,
            validation: ValidationReport::default(),
            selection: RowSelection::default(),
            suggestions: None,
        };
        dataset.revalidate();
        dataset
    }

    /// Parse the file at `path` and start a session over it.
    pub fn open(path: &Path, options: &ParseOptions, registry: &SchemaRegistry) -> Result<Self> {
        let table = parse_path(path, options)?;
        Ok(Self::new(table, registry))
    }

    // === Accessors ===

    pub fn source_columns(&self) -> &[SourceColumn] {
        self.editor.columns()
    }

    pub fn target_fields(&self) -> &[TargetField] {
        self.editor.fields()
    }

    pub fn preview_rows(&self) -> &[Row] {
        &self.preview_rows
    }

    pub fn total_row_count(&self) -> usize {
        self.total_row_count
    }

    pub fn profiles(&self) -> &[ColumnProfile] {
        &self.profiles
    }

    /// SHA-256 of the source bytes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn mapping(&self) -> &Mapping {
        self.editor.mapping()
    }

    pub fn summary(&self) -> MappingSummary {
        self.editor.summary()
    }

    /// Result of the last [`Self::auto_detect`], if any.
    pub fn suggestions(&self) -> Option<&MappingResult> {
        self.suggestions.as_ref()
    }

    /// Validation of the preview rows under the current mapping.
    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    pub fn errors(&self) -> &[ValidationError] {
        self.validation.errors()
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    // === Mapping ===

    /// Replace the mapping with the auto-mapper's suggestions.
    pub fn auto_detect(&mut self, mapper: &AutoMapper) -> &MappingResult {
        let result = mapper.suggest(
            self.editor.columns(),
            self.editor.fields(),
            &self.preview_rows,
        );
        self.editor.apply_result(&result);
        tracing::info!(
            mapped = self.editor.mapping().len(),
            unmapped = result.unmapped_columns.len(),
            "auto-detected mapping"
        );
        self.revalidate();
        self.suggestions.insert(result)
    }

    /// Map `source` onto `target`; returns the source it displaced, if any.
    pub fn map(&mut self, source: &str, target: &str) -> Result<Option<String>> {
        let displaced = self.editor.map(source, target)?;
        self.revalidate();
        Ok(displaced)
    }

    pub fn unmap(&mut self, source: &str) -> Option<String> {
        let target = self.editor.unmap(source);
        self.revalidate();
        target
    }

    pub fn reset_mapping(&mut self) {
        self.editor.reset();
        self.revalidate();
    }

    /// Replace the mapping with saved entries.
    ///
    /// Entries pointing two columns at one field, or naming unknown fields,
    /// are refused as a whole.
    pub fn apply_mapping_config(&mut self, config: &MappingConfig) -> Result<()> {
        let errors = validate_mapping_config(config, self.editor.fields());
        if !errors.is_empty() {
            return Err(CoreError::InvalidMappingConfig { errors });
        }
        self.editor.apply_config(config)?;
        self.revalidate();
        Ok(())
    }

    // === Selection ===

    /// Add a row to the selection.
    ///
    /// Starts an explicit selection when none is active.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.select_many([index])
    }

    /// Add several rows, checking them all before any is applied.
    pub fn select_many(&mut self, indices: impl IntoIterator<Item = usize>) -> Result<()> {
        let mut picked = Vec::new();
        for index in indices {
            self.check_row(index)?;
            picked.push(index);
        }
        match &mut self.selection {
            RowSelection::Rows(rows) => rows.extend(picked),
            RowSelection::AllValid { .. } => {
                self.selection = RowSelection::Rows(picked.into_iter().collect());
            }
        }
        self.revalidate();
        Ok(())
    }

    /// Drop a row from the selection.
    ///
    /// Under the default selection the row is excluded from the valid rows.
    pub fn deselect(&mut self, index: usize) {
        match &mut self.selection {
            RowSelection::Rows(rows) => {
                rows.remove(&index);
            }
            RowSelection::AllValid { excluded } => {
                excluded.insert(index);
            }
        }
        self.revalidate();
    }

    /// Select every row of the file, valid or not.
    pub fn select_all(&mut self) {
        self.selection = RowSelection::Rows((0..self.total_row_count).collect());
        self.revalidate();
    }

    /// Select the preview rows that currently validate.
    pub fn select_valid(&mut self) {
        self.selection = RowSelection::Rows(self.validation.committable_rows());
        self.revalidate();
    }

    /// Back to the default: every valid row.
    pub fn clear_selection(&mut self) {
        self.selection = RowSelection::default();
        self.revalidate();
    }

    // === Commit ===

    /// Snapshot for the commit engine over the full row set.
    pub fn commit_request(&self, full_rows: Vec<Row>, batch_size: usize) -> CommitRequest {
        let request = CommitRequest::new(
            full_rows,
            self.editor.mapping().clone(),
            self.editor.fields().to_vec(),
        )
        .with_batch_size(batch_size);
        match &self.selection {
            RowSelection::AllValid { excluded } => request.with_exclusions(excluded.clone()),
            RowSelection::Rows(rows) => request.with_selection(rows.clone()),
        }
    }

    fn check_row(&self, index: usize) -> Result<()> {
        if index < self.total_row_count {
            Ok(())
        } else {
            Err(CoreError::RowOutOfRange {
                index,
                total: self.total_row_count,
            })
        }
    }

    fn revalidate(&mut self) {
        self.validation = validate_with_columns(
            &self.preview_rows,
            Some(self.editor.columns()),
            self.editor.mapping(),
            self.editor.fields(),
        );
    }
}
