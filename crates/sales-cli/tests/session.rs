use std::path::Path;

use sales_cli::session::{
    MappingEdits, apply_mapping_edits, load_registry, open_dataset, parse_options,
    read_mapping_file, write_mapping_file,
};
use sales_core::Dataset;
use sales_map::AutoMapper;

const ORDERS: &str = "\
Order Date;Total $;Qty;Region
2024-01-01;$12.50;3;North
2024-01-02;$8.00;1;South
";

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn open(dir: &Path) -> Dataset {
    let path = write_file(dir, "orders.csv", ORDERS);
    let registry = load_registry(None).unwrap();
    open_dataset(&path, &parse_options(None, None, 100), &registry).unwrap()
}

#[test]
fn loads_built_in_and_custom_schemas() {
    assert_eq!(load_registry(None).unwrap().len(), 11);

    let dir = tempfile::tempdir().unwrap();
    let schema = write_file(
        dir.path(),
        "schema.csv",
        "Field Id,Label,Required,Type\nsku,SKU,Yes,text\n",
    );
    let registry = load_registry(Some(&schema)).unwrap();
    assert!(registry.contains("sku"));

    let err = load_registry(Some(&dir.path().join("missing.csv"))).unwrap_err();
    assert!(err.to_string().starts_with("load schema "));
}

#[test]
fn forced_delimiter_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "orders.csv", ORDERS);
    let registry = load_registry(None).unwrap();
    let dataset = open_dataset(&path, &parse_options(Some(b','), None, 100), &registry).unwrap();
    assert_eq!(dataset.source_columns().len(), 1);
}

#[test]
fn edits_apply_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut dataset = open(dir.path());
    let edits = MappingEdits {
        auto_detect: true,
        unmap: vec!["Qty".to_string()],
        map: vec![("Region".to_string(), "category".to_string())],
        ..MappingEdits::default()
    };

    apply_mapping_edits(&mut dataset, &edits, &AutoMapper::default()).unwrap();

    assert_eq!(dataset.mapping().target_for("Order Date"), Some("date"));
    assert_eq!(dataset.mapping().target_for("Qty"), None);
    assert_eq!(dataset.mapping().target_for("Region"), Some("category"));
}

#[test]
fn unknown_field_edit_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut dataset = open(dir.path());
    let edits = MappingEdits {
        map: vec![("Region".to_string(), "territory".to_string())],
        ..MappingEdits::default()
    };

    let err = apply_mapping_edits(&mut dataset, &edits, &AutoMapper::default()).unwrap_err();
    insta::assert_snapshot!(format!("{err:#}"), @"map 'Region' to 'territory': Target field not found: territory");
}

#[test]
fn saved_mapping_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut dataset = open(dir.path());
    dataset.auto_detect(&AutoMapper::default());
    let saved = dir.path().join("mapping.json");
    write_mapping_file(&saved, &dataset).unwrap();

    let config = read_mapping_file(&saved).unwrap();
    assert_eq!(config.entries.get("Total $").map(String::as_str), Some("amount"));

    let mut reopened = open(dir.path());
    let edits = MappingEdits {
        mapping_file: Some(saved),
        ..MappingEdits::default()
    };
    apply_mapping_edits(&mut reopened, &edits, &AutoMapper::default()).unwrap();
    assert_eq!(reopened.mapping(), dataset.mapping());
}

#[test]
fn duplicate_mapping_file_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let mut dataset = open(dir.path());
    let saved = write_file(
        dir.path(),
        "mapping.json",
        r#"{"Order Date": "date", "Region": "date"}"#,
    );
    let edits = MappingEdits {
        mapping_file: Some(saved),
        ..MappingEdits::default()
    };

    let err = apply_mapping_edits(&mut dataset, &edits, &AutoMapper::default()).unwrap_err();
    insta::assert_snapshot!(
        err.root_cause().to_string(),
        @"mapping file is invalid: Field 'date' is claimed by more than one column: Order Date, Region"
    );
    assert!(dataset.mapping().is_empty());
}
