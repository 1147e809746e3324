//! Range checks on parsed values.

use sales_model::coerce::{MAX_DATE, MIN_DATE};
use sales_model::{TargetField, TypedValue, ValidationError, ValidationErrorKind};

/// Check a parsed value against the field's bounds.
///
/// Numbers use the field's optional `min`/`max`; dates must fall inside
/// the accepted window regardless of the field.
pub fn check(row_index: usize, field: &TargetField, value: &TypedValue) -> Option<ValidationError> {
    let message = match value {
        TypedValue::Date(date) if *date < MIN_DATE || *date > MAX_DATE => {
            format!("{}: {date} is outside {MIN_DATE}..{MAX_DATE}", field.label)
        }
        TypedValue::Currency(number) | TypedValue::Number(number) => {
            if let Some(min) = field.min.filter(|min| number < min) {
                format!("{}: {value} is below the minimum of {min}", field.label)
            } else if let Some(max) = field.max.filter(|max| number > max) {
                format!("{}: {value} exceeds the maximum of {max}", field.label)
            } else {
                return None;
            }
        }
        _ => return None,
    };
    Some(ValidationError::row(
        row_index,
        &field.id,
        ValidationErrorKind::OutOfRange,
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sales_model::FieldType;

    #[test]
    fn test_numeric_bounds() {
        let field = TargetField::new("quantity", "Quantity", FieldType::Number)
            .with_range(Some(0.0), Some(1000.0));
        assert!(check(0, &field, &TypedValue::Number(0.0)).is_none());
        assert!(check(0, &field, &TypedValue::Number(1000.0)).is_none());

        let low = check(3, &field, &TypedValue::Number(-3.0)).unwrap();
        assert_eq!(low.kind, ValidationErrorKind::OutOfRange);
        assert_eq!(low.message, "Quantity: -3 is below the minimum of 0");

        let high = check(3, &field, &TypedValue::Number(1500.0)).unwrap();
        assert_eq!(high.message, "Quantity: 1500 exceeds the maximum of 1000");
    }

    #[test]
    fn test_date_window() {
        let field = TargetField::new("date", "Date", FieldType::Date);
        let old = NaiveDate::from_ymd_opt(1850, 6, 1).unwrap();
        let error = check(0, &field, &TypedValue::Date(old)).unwrap();
        assert_eq!(
            error.message,
            "Date: 1850-06-01 is outside 1900-01-01..2100-12-31"
        );

        let fine = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(check(0, &field, &TypedValue::Date(fine)).is_none());
    }

    #[test]
    fn test_unbounded_fields_accept_anything() {
        let field = TargetField::new("amount", "Amount", FieldType::Currency);
        assert!(check(0, &field, &TypedValue::Currency(-1e9)).is_none());
    }
}
