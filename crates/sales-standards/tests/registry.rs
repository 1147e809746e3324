use std::io::Write;

use sales_standards::{FieldType, SchemaRegistry, StandardsError};

#[test]
fn default_schema_has_single_required_date_field() {
    let registry = SchemaRegistry::default_sales().expect("embedded schema loads");

    let required: Vec<&str> = registry.required_fields().map(|f| f.id.as_str()).collect();
    assert_eq!(required, vec!["date"]);
    assert_eq!(registry.fields()[0].id, "date");
    assert_eq!(registry.get("date").unwrap().field_type, FieldType::Date);
}

#[test]
fn default_schema_declares_typed_sales_fields() {
    let registry = SchemaRegistry::default_sales().unwrap();

    assert_eq!(registry.get("amount").unwrap().field_type, FieldType::Currency);
    assert_eq!(registry.get("quantity").unwrap().field_type, FieldType::Number);
    assert_eq!(
        registry.get("customer_email").unwrap().field_type,
        FieldType::Email
    );
    assert_eq!(
        registry.get("customer_phone").unwrap().field_type,
        FieldType::Phone
    );
    assert_eq!(registry.get("quantity").unwrap().min, Some(0.0));
    assert!(
        registry
            .get("amount")
            .unwrap()
            .synonyms
            .iter()
            .any(|s| s == "total")
    );
}

#[test]
fn default_schema_currency_order_puts_amount_first() {
    let registry = SchemaRegistry::default_sales().unwrap();
    assert!(registry.position("amount") < registry.position("unit_price"));
}

#[test]
fn loads_schema_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "Field Id,Label,Required,Type,Description,Synonyms,Keywords,Min,Max\n\
         sold_on,Sold On,yes,date,When,sold on|date,date,,\n\
         revenue,Revenue,no,money,Takings,revenue|total,total,,\n"
    )
    .unwrap();

    let registry = SchemaRegistry::from_path(file.path()).unwrap();
    assert_eq!(registry.len(), 2);
    assert!(registry.get("sold_on").unwrap().required);
    assert_eq!(
        registry.get("revenue").unwrap().field_type,
        FieldType::Currency
    );
}

#[test]
fn missing_schema_file_is_reported() {
    let err = SchemaRegistry::from_path(std::path::Path::new("/nonexistent/fields.csv"))
        .unwrap_err();
    assert!(matches!(err, StandardsError::FileNotFound { .. }));
}

#[test]
fn header_only_schema_is_rejected() {
    let err = SchemaRegistry::from_csv_str(
        "Field Id,Label,Required,Type,Description,Synonyms,Keywords,Min,Max\n",
        "empty.csv",
    )
    .unwrap_err();
    assert!(matches!(err, StandardsError::Empty { .. }));
}
