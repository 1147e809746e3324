use std::collections::BTreeMap;

use proptest::prelude::*;
use sales_map::{CompletionStatus, MappingEditor};
use sales_model::{FieldType, SourceColumn, TargetField};

const COLUMNS: &[&str] = &["Order Date", "Ship Date", "Total $", "Qty", "Customer", "Notes"];
const FIELDS: &[&str] = &["date", "amount", "quantity", "customer_name"];

fn editor() -> MappingEditor {
    let columns = COLUMNS.iter().map(|c| SourceColumn::new(*c).unwrap()).collect();
    let fields = FIELDS
        .iter()
        .map(|id| TargetField::new(*id, *id, FieldType::Text).required(*id == "date"))
        .collect();
    MappingEditor::new(columns, fields)
}

fn snapshot(editor: &MappingEditor) -> BTreeMap<String, String> {
    editor
        .mapping()
        .iter()
        .map(|(s, t)| (s.to_string(), t.to_string()))
        .collect()
}

#[test]
fn remapping_a_target_unmaps_the_previous_source() {
    let mut editor = editor();
    editor.map("Order Date", "date").unwrap();

    editor.map("Ship Date", "date").unwrap();

    assert_eq!(editor.mapping().target_for("Order Date"), None);
    assert_eq!(editor.mapping().source_for("date"), Some("Ship Date"));
    let date_sources = editor
        .mapping()
        .iter()
        .filter(|(_, target)| *target == "date")
        .count();
    assert_eq!(date_sources, 1);
}

#[test]
fn status_tracks_progress() {
    let mut editor = editor();
    assert_eq!(editor.completion_status(), CompletionStatus::Empty);
    editor.map("Order Date", "date").unwrap();
    assert_eq!(editor.completion_status(), CompletionStatus::Partial);
    editor.map("Total $", "amount").unwrap();
    assert_eq!(editor.completion_status(), CompletionStatus::Good);
    editor.map("Qty", "quantity").unwrap();
    editor.map("Customer", "customer_name").unwrap();
    assert_eq!(editor.completion_status(), CompletionStatus::Complete);
    assert_eq!(editor.completion_status().to_string(), "complete");
}

#[derive(Debug, Clone)]
enum Op {
    Map(usize, usize),
    Unmap(usize),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..COLUMNS.len(), 0..FIELDS.len()).prop_map(|(c, f)| Op::Map(c, f)),
        3 => (0..COLUMNS.len()).prop_map(Op::Unmap),
        1 => Just(Op::Reset),
    ]
}

fn apply(editor: &mut MappingEditor, op: &Op) {
    match op {
        Op::Map(c, f) => {
            editor.map(COLUMNS[*c], FIELDS[*f]).unwrap();
        }
        Op::Unmap(c) => {
            editor.unmap(COLUMNS[*c]);
        }
        Op::Reset => editor.reset(),
    }
}

proptest! {
    #[test]
    fn every_target_has_at_most_one_source(ops in prop::collection::vec(op(), 0..40)) {
        let mut editor = editor();
        for op in &ops {
            apply(&mut editor, op);

            let mapping = editor.mapping();
            let mut targets: Vec<&str> = mapping.iter().map(|(_, t)| t).collect();
            let before = targets.len();
            targets.sort_unstable();
            targets.dedup();
            prop_assert_eq!(targets.len(), before);
            for (source, target) in mapping.iter() {
                prop_assert_eq!(mapping.source_for(target), Some(source));
            }
        }
    }

    #[test]
    fn map_then_unmap_keeps_other_entries(
        ops in prop::collection::vec(op(), 0..20),
        column in 0..COLUMNS.len(),
        field in 0..FIELDS.len(),
    ) {
        let mut editor = editor();
        for op in &ops {
            apply(&mut editor, op);
        }
        let source = COLUMNS[column];
        let target = FIELDS[field];
        let before = snapshot(&editor);

        editor.map(source, target).unwrap();
        editor.unmap(source);
        let after = snapshot(&editor);

        let untouched: BTreeMap<String, String> = before
            .into_iter()
            .filter(|(s, t)| s != source && t != target)
            .collect();
        prop_assert_eq!(after, untouched);
    }
}
