//! Building an import session from command-line inputs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use sales_core::Dataset;
use sales_ingest::ParseOptions;
use sales_map::AutoMapper;
use sales_model::MappingConfig;
use sales_standards::SchemaRegistry;

use crate::logging::redact_value;

/// Mapping edits in the order they are applied.
///
/// Auto-detection runs first, then the saved file replaces its result, then
/// `unmap` and finally `map` edits.
#[derive(Debug, Clone, Default)]
pub struct MappingEdits {
    pub auto_detect: bool,
    pub mapping_file: Option<PathBuf>,
    pub unmap: Vec<String>,
    pub map: Vec<(String, String)>,
}

/// Load the schema from `path`, or the built-in sales schema.
pub fn load_registry(path: Option<&Path>) -> Result<SchemaRegistry> {
    let registry = match path {
        Some(path) => SchemaRegistry::from_path(path)
            .with_context(|| format!("load schema {}", path.display()))?,
        None => SchemaRegistry::default_sales().context("load built-in sales schema")?,
    };
    debug!(fields = registry.len(), "schema loaded");
    Ok(registry)
}

/// Parse options from the command-line overrides.
pub fn parse_options(
    delimiter: Option<u8>,
    content_type: Option<&str>,
    preview_rows: usize,
) -> ParseOptions {
    let mut options = ParseOptions::default().with_preview_rows(preview_rows);
    if let Some(delimiter) = delimiter {
        options = options.with_delimiter(delimiter);
    }
    if let Some(content_type) = content_type {
        options = options.with_content_type(content_type);
    }
    options
}

pub fn open_dataset(
    path: &Path,
    options: &ParseOptions,
    registry: &SchemaRegistry,
) -> Result<Dataset> {
    let dataset = Dataset::open(path, options, registry)
        .with_context(|| format!("parse {}", path.display()))?;
    info!(
        file = %path.display(),
        columns = dataset.source_columns().len(),
        rows = dataset.total_row_count(),
        "file opened"
    );
    for row in dataset.preview_rows().iter().take(3) {
        for (column, value) in &row.cells {
            tracing::trace!(row = row.index, column = %column, value = redact_value(value), "preview cell");
        }
    }
    Ok(dataset)
}

/// Apply `edits` to the session's mapping.
pub fn apply_mapping_edits(
    dataset: &mut Dataset,
    edits: &MappingEdits,
    mapper: &AutoMapper,
) -> Result<()> {
    if edits.auto_detect {
        dataset.auto_detect(mapper);
    }
    if let Some(path) = &edits.mapping_file {
        let config = read_mapping_file(path)?;
        dataset
            .apply_mapping_config(&config)
            .with_context(|| format!("apply mapping {}", path.display()))?;
    }
    for source in &edits.unmap {
        if dataset.unmap(source).is_none() {
            tracing::warn!(column = %source, "column was not mapped");
        }
    }
    for (source, target) in &edits.map {
        let displaced = dataset
            .map(source, target)
            .with_context(|| format!("map '{source}' to '{target}'"))?;
        if let Some(previous) = displaced {
            debug!(field = %target, previous = %previous, column = %source, "field reassigned");
        }
    }
    Ok(())
}

/// Read a saved mapping: a JSON object of source column to field id.
pub fn read_mapping_file(path: &Path) -> Result<MappingConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read mapping {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse mapping {}", path.display()))
}

/// Save the session's mapping for reuse with [`read_mapping_file`].
pub fn write_mapping_file(path: &Path, dataset: &Dataset) -> Result<()> {
    let config = dataset.mapping().to_config();
    let mut content = serde_json::to_string_pretty(&config).context("serialize mapping")?;
    content.push('\n');
    fs::write(path, content).with_context(|| format!("write mapping {}", path.display()))?;
    info!(path = %path.display(), entries = config.entries.len(), "mapping saved");
    Ok(())
}
