//! Type checks.

use sales_model::{TargetField, TypedValue, ValidationError, ValidationErrorKind, coerce};

/// Coerce a non-empty cell to the field's type.
pub fn check(
    row_index: usize,
    field: &TargetField,
    raw: &str,
) -> Result<TypedValue, ValidationError> {
    coerce(raw, field.field_type).map_err(|error| {
        ValidationError::row(
            row_index,
            &field.id,
            ValidationErrorKind::TypeMismatch,
            format!("{}: {error}", field.label),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_model::FieldType;

    #[test]
    fn test_amount_with_symbol_and_separators() {
        let field = TargetField::new("amount", "Amount", FieldType::Currency);
        assert_eq!(
            check(0, &field, "$1,234.50").unwrap(),
            TypedValue::Currency(1234.5)
        );
        assert_eq!(
            check(0, &field, "(12.00)").unwrap(),
            TypedValue::Currency(-12.0)
        );
    }

    #[test]
    fn test_mismatch_names_the_field() {
        let field = TargetField::new("customer_email", "Customer Email", FieldType::Email);
        let error = check(7, &field, "not-an-email").unwrap_err();
        assert_eq!(error.kind, ValidationErrorKind::TypeMismatch);
        assert_eq!(error.row_index, Some(7));
        assert_eq!(
            error.message,
            "Customer Email: 'not-an-email' is not a valid email address"
        );
    }

    #[test]
    fn test_text_never_fails() {
        let field = TargetField::new("product", "Product", FieldType::Text);
        assert_eq!(
            check(0, &field, "  Widget  ").unwrap(),
            TypedValue::Text("Widget".to_string())
        );
    }
}
