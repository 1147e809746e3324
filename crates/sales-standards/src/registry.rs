use std::path::Path;

use sales_model::TargetField;

use crate::embedded;
use crate::error::{Result, StandardsError};
use crate::loader::{load_fields_from_path, load_fields_from_str};

/// Ordered, read-only list of target fields for a session.
///
/// Declaration order is significant: it breaks ties in the auto-mapper and
/// orders every report.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRegistry {
    fields: Vec<TargetField>,
}

impl SchemaRegistry {
    /// Build a registry from already constructed fields.
    ///
    /// Field ids must be unique and non-empty.
    pub fn new(fields: Vec<TargetField>) -> Result<Self> {
        let mut seen = std::collections::BTreeSet::new();
        for field in &fields {
            if field.id.trim().is_empty() {
                return Err(StandardsError::EmptyFieldId {
                    file: "<inline>".to_string(),
                    line: 0,
                });
            }
            if !seen.insert(field.id.as_str()) {
                return Err(StandardsError::DuplicateField {
                    id: field.id.clone(),
                    file: "<inline>".to_string(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// The embedded default sales schema.
    pub fn default_sales() -> Result<Self> {
        let fields = load_fields_from_str(embedded::SALES_FIELDS, "sales_fields.csv")?;
        Ok(Self { fields })
    }

    pub fn from_csv_str(content: &str, file: &str) -> Result<Self> {
        Ok(Self {
            fields: load_fields_from_str(content, file)?,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self {
            fields: load_fields_from_path(path)?,
        })
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    pub fn get(&self, id: &str) -> Option<&TargetField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Declaration index of a field.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &TargetField> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_model::FieldType;

    #[test]
    fn new_rejects_duplicate_ids() {
        let fields = vec![
            TargetField::new("date", "Date", FieldType::Date),
            TargetField::new("date", "Other Date", FieldType::Date),
        ];
        assert!(matches!(
            SchemaRegistry::new(fields),
            Err(StandardsError::DuplicateField { .. })
        ));
    }

    #[test]
    fn lookup_by_id_and_position() {
        let registry = SchemaRegistry::new(vec![
            TargetField::new("date", "Date", FieldType::Date).required(true),
            TargetField::new("amount", "Amount", FieldType::Currency),
        ])
        .unwrap();

        assert_eq!(registry.position("amount"), Some(1));
        assert_eq!(registry.get("date").map(|f| f.required), Some(true));
        assert_eq!(registry.required_fields().count(), 1);
        assert!(!registry.contains("region"));
    }
}
