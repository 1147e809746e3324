use sales_model::{
    FieldType, Mapping, MappingConfig, TargetField, ValidationError, ValidationErrorKind,
};

#[test]
fn target_field_builder_sets_all_parts() {
    let field = TargetField::new("quantity", "Quantity", FieldType::Number)
        .with_description("Units sold")
        .with_synonyms(["qty", "units"])
        .with_keywords(["quantity", "count"])
        .with_range(Some(0.0), None);

    assert!(!field.required);
    assert_eq!(field.synonyms, vec!["qty", "units"]);
    assert_eq!(field.min, Some(0.0));
    assert_eq!(field.max, None);
}

#[test]
fn target_field_deserializes_with_defaults() {
    let json = r#"{
        "id": "date",
        "label": "Date",
        "required": true,
        "field_type": "date",
        "description": "Transaction date"
    }"#;
    let field: TargetField = serde_json::from_str(json).expect("deserialize field");
    assert_eq!(field.field_type, FieldType::Date);
    assert!(field.synonyms.is_empty());
    assert!(field.required);
}

#[test]
fn validation_error_display_distinguishes_levels() {
    let dataset = ValidationError::dataset(
        Some("date"),
        ValidationErrorKind::RequiredMissing,
        "Required field 'Date' is not mapped",
    );
    let row = ValidationError::row(
        4,
        "amount",
        ValidationErrorKind::TypeMismatch,
        "'abc' is not a valid currency amount",
    );

    assert!(dataset.is_dataset_level());
    assert_eq!(
        dataset.to_string(),
        "dataset: [required_missing] Required field 'Date' is not mapped"
    );
    assert_eq!(
        row.to_string(),
        "row 4: [type_mismatch] 'abc' is not a valid currency amount"
    );
}

#[test]
fn validation_error_kind_serializes_snake_case() {
    let json = serde_json::to_string(&ValidationErrorKind::DuplicateMapping).unwrap();
    assert_eq!(json, r#""duplicate_mapping""#);
}

#[test]
fn mapping_round_trips_through_config() {
    let mut mapping = Mapping::new();
    mapping.assign("Order Date", "date");
    mapping.assign("Qty", "quantity");

    let config: MappingConfig = mapping.to_config();
    assert!(config.duplicate_targets().is_empty());
    assert_eq!(Mapping::try_from(config).unwrap(), mapping);
}
