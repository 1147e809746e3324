use serde::{Deserialize, Serialize};

use crate::field::FieldType;

/// Statistics about a source column, computed from the preview rows.
///
/// This is the inferred preview schema shown next to each source column
/// and consumed by the content-based matchers of the auto-mapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Type most sample values agree on, `None` without evidence.
    pub inferred_type: Option<FieldType>,
    /// True if the column contains numeric values.
    pub is_numeric: bool,
    /// Ratio of empty values to total rows (0.0 to 1.0).
    pub null_ratio: f64,
    /// Ratio of unique values to non-empty rows (0.0 to 1.0).
    pub unique_ratio: f64,
    /// A few distinct non-empty sample values.
    pub samples: Vec<String>,
}
