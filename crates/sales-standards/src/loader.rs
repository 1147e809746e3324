//! Schema CSV loading.

use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;

use serde::Deserialize;

use sales_model::{FieldType, TargetField};

use crate::error::{Result, StandardsError};

// =============================================================================
// CSV Row Type
// =============================================================================

/// Row from a schema CSV file.
#[derive(Debug, Deserialize)]
struct FieldCsvRow {
    #[serde(rename = "Field Id")]
    id: String,
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Required")]
    required: String,
    #[serde(rename = "Type")]
    field_type: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Synonyms", default)]
    synonyms: String,
    #[serde(rename = "Keywords", default)]
    keywords: String,
    #[serde(rename = "Min", default)]
    min: String,
    #[serde(rename = "Max", default)]
    max: String,
}

// =============================================================================
// Loading Functions
// =============================================================================

/// Load target fields from CSV content, preserving declaration order.
///
/// `file` names the source in error messages.
pub fn load_fields_from_str(content: &str, file: &str) -> Result<Vec<TargetField>> {
    let cursor = Cursor::new(content.as_bytes());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(cursor);

    let headers = reader
        .headers()
        .map_err(|e| StandardsError::CsvParse {
            file: file.to_string(),
            message: e.to_string(),
        })?
        .clone();

    let mut fields = Vec::new();
    let mut seen = BTreeSet::new();

    for result in reader.records() {
        let record = result.map_err(|e| StandardsError::CsvParse {
            file: file.to_string(),
            message: e.to_string(),
        })?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let line = record.position().map_or(0, csv::Position::line);
        let row: FieldCsvRow =
            record
                .deserialize(Some(&headers))
                .map_err(|e| StandardsError::CsvParse {
                    file: file.to_string(),
                    message: e.to_string(),
                })?;

        let id = row.id.trim().to_string();
        if id.is_empty() {
            return Err(StandardsError::EmptyFieldId {
                file: file.to_string(),
                line,
            });
        }
        if !seen.insert(id.clone()) {
            return Err(StandardsError::DuplicateField {
                id,
                file: file.to_string(),
            });
        }

        let required = parse_required(&row.required).ok_or_else(|| StandardsError::InvalidValue {
            field: "Required",
            value: row.required.clone(),
            id: id.clone(),
            file: file.to_string(),
        })?;
        let min = parse_bound(&row.min, "Min", &id, file)?;
        let max = parse_bound(&row.max, "Max", &id, file)?;

        let label = non_empty(&row.label).unwrap_or_else(|| id.clone());
        fields.push(
            TargetField::new(id, label, FieldType::parse_lenient(&row.field_type))
                .required(required)
                .with_description(row.description.trim())
                .with_synonyms(split_list(&row.synonyms))
                .with_keywords(split_list(&row.keywords))
                .with_range(min, max),
        );
    }

    if fields.is_empty() {
        return Err(StandardsError::Empty {
            file: file.to_string(),
        });
    }

    tracing::debug!(file, fields = fields.len(), "loaded target schema");
    Ok(fields)
}

/// Load target fields from a CSV file on disk.
pub fn load_fields_from_path(path: &Path) -> Result<Vec<TargetField>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StandardsError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StandardsError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    load_fields_from_str(&content, &path.display().to_string())
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_required(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "req" | "required" => Some(true),
        "no" | "n" | "false" | "0" | "" | "opt" | "optional" => Some(false),
        _ => None,
    }
}

fn parse_bound(raw: &str, column: &'static str, id: &str, file: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| StandardsError::InvalidValue {
            field: column,
            value: raw.to_string(),
            id: id.to_string(),
            file: file.to_string(),
        })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Field Id,Label,Required,Type,Description,Synonyms,Keywords,Min,Max\n";

    #[test]
    fn parses_lists_and_bounds() {
        let csv = format!("{HEADER}quantity,Quantity,No,number,Units,qty|units,count,0,\n");
        let fields = load_fields_from_str(&csv, "test.csv").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].synonyms, vec!["qty", "units"]);
        assert_eq!(fields[0].keywords, vec!["count"]);
        assert_eq!(fields[0].min, Some(0.0));
        assert_eq!(fields[0].max, None);
    }

    #[test]
    fn rejects_bad_required_flag() {
        let csv = format!("{HEADER}date,Date,maybe,date,,,,,\n");
        let err = load_fields_from_str(&csv, "test.csv").unwrap_err();
        assert!(matches!(
            err,
            StandardsError::InvalidValue {
                field: "Required",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_numeric_bound() {
        let csv = format!("{HEADER}amount,Amount,No,currency,,,,zero,\n");
        assert!(load_fields_from_str(&csv, "test.csv").is_err());
    }

    #[test]
    fn unknown_type_is_lenient() {
        let csv = format!("{HEADER}notes,Notes,No,blob,,,,,\n");
        let fields = load_fields_from_str(&csv, "test.csv").unwrap();
        assert_eq!(fields[0].field_type, FieldType::Unknown);
    }

    #[test]
    fn split_list_ignores_blanks() {
        assert_eq!(split_list(" a | |b "), vec!["a", "b"]);
        assert!(split_list("").is_empty());
    }
}
