//! Dataset-level mapping checks.

use sales_model::{Mapping, MappingConfig, TargetField, ValidationError, ValidationErrorKind};

/// Check the mapping itself, independent of any row.
///
/// A required field with no source is reported exactly once, never per row.
pub fn check(
    mapping: &Mapping,
    fields: &[TargetField],
    known_column: impl Fn(&str) -> bool,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for field in fields {
        if field.required && !mapping.is_target_mapped(&field.id) {
            errors.push(ValidationError::dataset(
                Some(&field.id),
                ValidationErrorKind::RequiredMissing,
                format!(
                    "Required field '{}' is not mapped to any source column",
                    field.label
                ),
            ));
        }
    }

    for (source, target) in mapping.iter() {
        if !fields.iter().any(|f| f.id == target) {
            errors.push(unknown_field(source, target));
        } else if !known_column(source) {
            errors.push(ValidationError::dataset(
                Some(target),
                ValidationErrorKind::General,
                format!("Mapping for '{target}' uses column '{source}', which is not in the file"),
            ));
        }
    }

    errors
}

/// Check raw mapping entries that have not been through a [`Mapping`].
pub fn check_config(config: &MappingConfig, fields: &[TargetField]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (target, sources) in config.duplicate_targets() {
        errors.push(ValidationError::dataset(
            Some(target),
            ValidationErrorKind::DuplicateMapping,
            format!(
                "Field '{target}' is claimed by more than one column: {}",
                sources.join(", ")
            ),
        ));
    }

    for (source, target) in &config.entries {
        if !fields.iter().any(|f| &f.id == target) {
            errors.push(unknown_field(source, target));
        }
    }

    errors
}

fn unknown_field(source: &str, target: &str) -> ValidationError {
    ValidationError::dataset(
        Some(target),
        ValidationErrorKind::General,
        format!("Column '{source}' is mapped to unknown field '{target}'"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_model::FieldType;

    fn fields() -> Vec<TargetField> {
        vec![
            TargetField::new("date", "Date", FieldType::Date).required(true),
            TargetField::new("amount", "Amount", FieldType::Currency),
        ]
    }

    #[test]
    fn test_unmapped_required_reported_once() {
        let errors = check(&Mapping::new(), &fields(), |_| true);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_dataset_level());
        assert_eq!(errors[0].target_field_id.as_deref(), Some("date"));
    }

    #[test]
    fn test_unknown_column_and_field() {
        let mut mapping = Mapping::new();
        mapping.assign("Order Date", "date");
        mapping.assign("Ghost", "amount");
        mapping.assign("Notes", "memo");

        let errors = check(&mapping, &fields(), |c| c != "Ghost");
        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ValidationErrorKind::General, ValidationErrorKind::General]
        );
        assert!(errors.iter().all(ValidationError::is_dataset_level));
    }

    #[test]
    fn test_config_duplicates() {
        let config: MappingConfig = [("Order Date", "date"), ("Ship Date", "date")]
            .into_iter()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect();
        let errors = check_config(&config, &fields());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateMapping);
        assert_eq!(
            errors[0].message,
            "Field 'date' is claimed by more than one column: Order Date, Ship Date"
        );
    }
}
