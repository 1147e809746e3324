use std::collections::BTreeSet;
use std::io::Write;

use proptest::prelude::*;
use sales_commit::{CommitError, CommitHandle, MemorySink, RowFate, run};
use sales_core::{CoreError, Dataset, RowSelection};
use sales_ingest::{ParseOptions, parse_bytes, read_all_rows};
use sales_map::{AutoMapper, CompletionStatus};
use sales_model::{MappingConfig, ValidationErrorKind};
use sales_standards::SchemaRegistry;

const ORDERS: &str = "\
Order Date,Total $,Qty,Region
2024-01-01,$12.50,3,North
2024-01-02,$8.00,1,South
,$3.00,2,East
2024-01-04,lots,1,West
";

fn dataset() -> Dataset {
    let registry = SchemaRegistry::default_sales().unwrap();
    let table = parse_bytes(ORDERS.as_bytes(), &ParseOptions::default()).unwrap();
    Dataset::new(table, &registry)
}

#[test]
fn new_dataset_reports_unmapped_required_field() {
    let dataset = dataset();
    assert_eq!(dataset.total_row_count(), 4);
    assert_eq!(dataset.source_columns().len(), 4);
    assert!(dataset.mapping().is_empty());

    let dataset_errors: Vec<_> = dataset.validation().dataset_errors().collect();
    assert_eq!(dataset_errors.len(), 1);
    assert_eq!(dataset_errors[0].kind, ValidationErrorKind::RequiredMissing);
}

#[test]
fn auto_detect_maps_and_revalidates() {
    let mut dataset = dataset();
    let result = dataset.auto_detect(&AutoMapper::default());
    assert!(result.unmapped_columns.is_empty());

    assert_eq!(dataset.mapping().target_for("Order Date"), Some("date"));
    assert_eq!(dataset.mapping().target_for("Total $"), Some("amount"));
    assert_eq!(dataset.mapping().target_for("Qty"), Some("quantity"));
    assert_eq!(dataset.mapping().target_for("Region"), Some("region"));
    assert!(dataset.suggestions().is_some());

    let report = dataset.validation();
    assert!(!report.has_dataset_errors());
    assert_eq!(report.invalid_rows(), BTreeSet::from([2, 3]));
    assert_eq!(report.valid_count(), 2);
}

#[test]
fn edits_go_through_the_editor() {
    let mut dataset = dataset();
    dataset.map("Order Date", "date").unwrap();
    assert!(!dataset.validation().has_dataset_errors());

    dataset.map("Region", "date").unwrap();
    assert_eq!(dataset.mapping().target_for("Order Date"), None);
    // Region values are not dates.
    assert_eq!(dataset.validation().invalid_count(), 4);

    assert_eq!(dataset.unmap("Region"), Some("date".to_string()));
    assert!(dataset.validation().has_dataset_errors());

    assert!(matches!(
        dataset.map("Nope", "date"),
        Err(CoreError::Mapping(_))
    ));

    dataset.map("Qty", "quantity").unwrap();
    dataset.reset_mapping();
    assert!(dataset.mapping().is_empty());
    assert_eq!(dataset.summary().status, CompletionStatus::Empty);
}

#[test]
fn duplicate_mapping_file_is_refused() {
    let mut dataset = dataset();
    dataset.map("Qty", "quantity").unwrap();
    let config: MappingConfig = [("Order Date", "date"), ("Region", "date")]
        .into_iter()
        .map(|(s, t)| (s.to_string(), t.to_string()))
        .collect();

    let err = dataset.apply_mapping_config(&config).unwrap_err();
    match err {
        CoreError::InvalidMappingConfig { errors } => {
            assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateMapping);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(dataset.mapping().target_for("Qty"), Some("quantity"));
}

#[test]
fn selection_operations() {
    let mut dataset = dataset();
    dataset.auto_detect(&AutoMapper::default());
    assert!(!dataset.selection().is_explicit());

    dataset.select_valid();
    assert_eq!(dataset.selection().rows(), Some(&BTreeSet::from([0, 1])));

    dataset.select(3).unwrap();
    dataset.deselect(0);
    assert_eq!(dataset.selection().rows(), Some(&BTreeSet::from([1, 3])));

    assert!(matches!(
        dataset.select(10),
        Err(CoreError::RowOutOfRange { index: 10, total: 4 })
    ));

    dataset.select_all();
    assert_eq!(dataset.selection().rows().map(BTreeSet::len), Some(4));

    dataset.clear_selection();
    assert_eq!(dataset.selection(), &RowSelection::default());
}

#[test]
fn select_many_checks_every_row_first() {
    let mut dataset = dataset();
    dataset.select_many([0, 2]).unwrap();
    assert_eq!(dataset.selection().rows(), Some(&BTreeSet::from([0, 2])));

    assert!(matches!(
        dataset.select_many([1, 4, 3]),
        Err(CoreError::RowOutOfRange { index: 4, total: 4 })
    ));
    assert_eq!(dataset.selection().rows(), Some(&BTreeSet::from([0, 2])));

    // Unbounded input stops at the first row past the end.
    assert!(dataset.select_many(0..).is_err());
    assert_eq!(dataset.selection().rows(), Some(&BTreeSet::from([0, 2])));
}

#[test]
fn emptied_selection_commits_nothing() {
    let mut dataset = dataset();
    dataset.auto_detect(&AutoMapper::default());
    let rows = read_all_rows(ORDERS.as_bytes(), &ParseOptions::default()).unwrap();

    dataset.select(1).unwrap();
    dataset.deselect(1);
    assert_eq!(dataset.selection(), &RowSelection::Rows(BTreeSet::new()));

    let request = dataset.commit_request(rows, 2);
    assert_eq!(request.selection, Some(BTreeSet::new()));
    let mut sink = MemorySink::new();
    let err = run(&request, &mut sink, &CommitHandle::new(), |_| {}).unwrap_err();
    assert_eq!(err, CommitError::NothingToCommit { selected: 0 });
    assert!(sink.records().is_empty());
}

#[test]
fn deselect_without_selection_excludes_row() {
    let mut dataset = dataset();
    dataset.auto_detect(&AutoMapper::default());
    let rows = read_all_rows(ORDERS.as_bytes(), &ParseOptions::default()).unwrap();

    dataset.deselect(0);
    assert!(!dataset.selection().is_explicit());

    let request = dataset.commit_request(rows, 10);
    assert_eq!(request.selection, None);
    let outcome = run(&request, &mut MemorySink::new(), &CommitHandle::new(), |_| {}).unwrap();
    assert_eq!(outcome.committed_count, 1);
    assert_eq!(outcome.fate(0), Some(&RowFate::SkippedBySelection));
}

#[test]
fn commit_request_snapshots_state() {
    let mut dataset = dataset();
    dataset.auto_detect(&AutoMapper::default());
    let rows = read_all_rows(ORDERS.as_bytes(), &ParseOptions::default()).unwrap();

    let request = dataset.commit_request(rows.clone(), 2);
    assert_eq!(request.selection, None);
    assert_eq!(request.batch_size, 2);

    let outcome = run(&request, &mut MemorySink::new(), &CommitHandle::new(), |_| {}).unwrap();
    assert_eq!(outcome.committed_count, 2);
    assert_eq!(outcome.skipped_count, 2);

    dataset.select_all();
    let request = dataset.commit_request(rows, 2);
    dataset.reset_mapping();
    // The request keeps the mapping it was built with.
    assert_eq!(request.mapping.len(), 4);
    let outcome = run(&request, &mut MemorySink::new(), &CommitHandle::new(), |_| {}).unwrap();
    assert_eq!(outcome.committed_count, 2);
    assert_eq!(outcome.error_count, 2);
}

#[test]
fn opens_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(ORDERS.as_bytes()).unwrap();
    let registry = SchemaRegistry::default_sales().unwrap();

    let dataset = Dataset::open(file.path(), &ParseOptions::default(), &registry).unwrap();
    assert_eq!(dataset.preview_rows().len(), 4);
    assert_eq!(dataset.fingerprint().len(), 64);
}

proptest! {
    #[test]
    fn validation_always_matches_a_fresh_run(
        ops in prop::collection::vec((0usize..4, 0usize..11, any::<bool>()), 0..30)
    ) {
        let registry = SchemaRegistry::default_sales().unwrap();
        let mut dataset = dataset();
        let columns: Vec<String> = dataset
            .source_columns()
            .iter()
            .map(ToString::to_string)
            .collect();

        for (column, field, unmap) in ops {
            let source = &columns[column];
            if unmap {
                dataset.unmap(source);
            } else {
                let target = registry.fields()[field].id.clone();
                dataset.map(source, &target).unwrap();
            }
            let fresh = sales_validate::validate_with_columns(
                dataset.preview_rows(),
                Some(dataset.source_columns()),
                dataset.mapping(),
                dataset.target_fields(),
            );
            prop_assert_eq!(dataset.validation(), &fresh);
        }
    }
}
