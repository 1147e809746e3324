use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A column as it exists in the uploaded file, identified by its header text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceColumn(String);

impl SourceColumn {
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::InvalidColumnName(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceColumn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A parsed data row.
///
/// `index` is the stable 0-based ordinal among data rows (header and empty
/// lines excluded). Cells are keyed by source column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub index: usize,
    pub cells: BTreeMap<String, String>,
}

impl Row {
    pub fn new(index: usize, cells: BTreeMap<String, String>) -> Self {
        Self { index, cells }
    }

    /// Build a row from header names and positional values.
    ///
    /// Missing trailing values become empty strings.
    pub fn from_values(index: usize, headers: &[SourceColumn], values: &[&str]) -> Self {
        let cells = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = values.get(idx).copied().unwrap_or("");
                (header.as_str().to_string(), value.to_string())
            })
            .collect();
        Self { index, cells }
    }

    /// Raw cell value; absent cells read as empty.
    pub fn value(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_column_rejects_blank_names() {
        assert!(SourceColumn::new("  ").is_err());
        assert_eq!(SourceColumn::new("Qty").unwrap().as_str(), "Qty");
    }

    #[test]
    fn from_values_pads_missing_cells() {
        let headers = vec![
            SourceColumn::new("A").unwrap(),
            SourceColumn::new("B").unwrap(),
        ];
        let row = Row::from_values(3, &headers, &["1"]);
        assert_eq!(row.index, 3);
        assert_eq!(row.value("A"), "1");
        assert_eq!(row.value("B"), "");
        assert_eq!(row.value("C"), "");
    }
}
