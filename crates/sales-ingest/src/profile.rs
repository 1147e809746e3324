//! Column profiles and sample value extraction.

use std::collections::{BTreeMap, BTreeSet};

use sales_model::coerce::{infer_value_type, parse_number};
use sales_model::{ColumnProfile, FieldType, Row, SourceColumn};

/// Default number of distinct sample values kept per column.
pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// Share of non-empty values that must agree before a type is inferred.
const TYPE_AGREEMENT: f64 = 0.8;

/// Builds one profile per header from a set of rows.
///
/// Analyzes each column to determine:
/// - Whether values are numeric
/// - Ratio of unique values (cardinality)
/// - Ratio of empty values
/// - The value type most samples agree on
pub fn build_column_profiles(
    headers: &[SourceColumn],
    rows: &[Row],
    sample_limit: usize,
) -> Vec<ColumnProfile> {
    headers
        .iter()
        .map(|header| analyze_column(header.as_str(), rows, sample_limit))
        .collect()
}

fn analyze_column(name: &str, rows: &[Row], sample_limit: usize) -> ColumnProfile {
    let total = rows.len();
    if total == 0 {
        return ColumnProfile {
            name: name.to_string(),
            inferred_type: None,
            is_numeric: false,
            null_ratio: 1.0,
            unique_ratio: 0.0,
            samples: Vec::new(),
        };
    }

    let mut null_count = 0usize;
    let mut numeric_count = 0usize;
    let mut unique_values: BTreeSet<&str> = BTreeSet::new();
    let mut samples: Vec<String> = Vec::new();
    let mut type_counts: BTreeMap<FieldType, usize> = BTreeMap::new();

    for row in rows {
        let trimmed = row.value(name).trim();
        if trimmed.is_empty() {
            null_count += 1;
            continue;
        }
        if unique_values.insert(trimmed) && samples.len() < sample_limit {
            samples.push(trimmed.to_string());
        }
        if parse_number(trimmed).is_some() {
            numeric_count += 1;
        }
        if let Some(field_type) = infer_value_type(trimmed) {
            *type_counts.entry(field_type).or_default() += 1;
        }
    }

    let non_null = total - null_count;
    let null_ratio = null_count as f64 / total as f64;
    let unique_ratio = if non_null > 0 {
        unique_values.len() as f64 / non_null as f64
    } else {
        0.0
    };

    // Numeric if >90% of non-empty values parse as numbers
    let is_numeric = non_null > 0 && (numeric_count as f64 / non_null as f64) > 0.9;

    ColumnProfile {
        name: name.to_string(),
        inferred_type: infer_column_type(&type_counts, non_null),
        is_numeric,
        null_ratio,
        unique_ratio,
        samples,
    }
}

/// Type shared by most non-empty values.
///
/// Numbers and amounts are pooled: a column mixing `12` and `$12.00`
/// is currency. Columns without agreement are text.
fn infer_column_type(counts: &BTreeMap<FieldType, usize>, non_null: usize) -> Option<FieldType> {
    if non_null == 0 {
        return None;
    }
    let share = |count: usize| count as f64 / non_null as f64;
    let count_of = |field_type| counts.get(&field_type).copied().unwrap_or(0);

    let currency = count_of(FieldType::Currency);
    let numeric = currency + count_of(FieldType::Number);
    if share(numeric) >= TYPE_AGREEMENT {
        return Some(if currency > 0 {
            FieldType::Currency
        } else {
            FieldType::Number
        });
    }

    let dominant = counts
        .iter()
        .filter(|(field_type, _)| !field_type.is_numeric())
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .filter(|(_, count)| share(**count) >= TYPE_AGREEMENT)
        .map(|(field_type, _)| *field_type);
    Some(dominant.unwrap_or(FieldType::Text))
}
