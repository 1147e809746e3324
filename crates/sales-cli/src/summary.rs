use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sales_commit::{CommitOutcome, CommitState, RowFate};
use sales_core::Dataset;
use sales_ingest::{ParsedTable, delimiter_name};
use sales_map::ConfidenceLevel;
use sales_model::{TargetField, ValidationError, ValidationErrorKind};
use sales_validate::ValidationReport;

pub fn print_fields(fields: &[TargetField]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Range"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in fields {
        table.add_row(vec![
            Cell::new(&field.id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&field.label),
            Cell::new(field.field_type.as_str()),
            required_cell(field.required),
            range_cell(field.min, field.max),
            Cell::new(&field.description),
        ]);
    }
    println!("{table}");
}

pub fn print_preview(table: &ParsedTable) {
    println!(
        "Delimiter: {}  Header line: {}  Rows: {}",
        delimiter_name(table.delimiter),
        table.header_line,
        table.total_row_count
    );
    if table.padded_rows > 0 || table.truncated_rows > 0 {
        println!(
            "Ragged rows: {} padded, {} truncated",
            table.padded_rows, table.truncated_rows
        );
    }
    println!("Fingerprint: {}", table.fingerprint);

    let mut profiles = Table::new();
    profiles.set_header(vec![
        header_cell("Column"),
        header_cell("Inferred"),
        header_cell("Empty"),
        header_cell("Unique"),
        header_cell("Samples"),
    ]);
    apply_table_style(&mut profiles);
    align_column(&mut profiles, 2, CellAlignment::Right);
    align_column(&mut profiles, 3, CellAlignment::Right);
    for profile in &table.profiles {
        profiles.add_row(vec![
            Cell::new(&profile.name).add_attribute(Attribute::Bold),
            match profile.inferred_type {
                Some(field_type) => Cell::new(field_type.as_str()),
                None => dim_cell("-"),
            },
            Cell::new(percent(profile.null_ratio)),
            Cell::new(percent(profile.unique_ratio)),
            Cell::new(profile.samples.join(", ")),
        ]);
    }
    println!();
    println!("Columns:");
    println!("{profiles}");

    let mut rows = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(table.headers.iter().map(|column| header_cell(column.as_str())));
    rows.set_header(header);
    apply_table_style(&mut rows);
    align_column(&mut rows, 0, CellAlignment::Right);
    for row in &table.preview_rows {
        let mut cells = vec![dim_cell(row.index)];
        cells.extend(
            table
                .headers
                .iter()
                .map(|column| Cell::new(row.value(column.as_str()))),
        );
        rows.add_row(cells);
    }
    println!();
    println!("Preview ({} of {} rows):", table.preview_rows.len(), table.total_row_count);
    println!("{rows}");
}

pub fn print_mapping(dataset: &Dataset) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Matcher"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    let suggestions = dataset.suggestions();
    for column in dataset.source_columns() {
        let source = column.as_str();
        let target = dataset.mapping().target_for(source);
        let suggestion = suggestions
            .and_then(|result| result.suggestion_for(source))
            .filter(|suggestion| Some(suggestion.target_field.as_str()) == target);
        let (confidence, matcher) = match suggestion {
            Some(suggestion) => (
                confidence_cell(suggestion.confidence, suggestion.level()),
                Cell::new(&suggestion.matcher),
            ),
            None if target.is_some() => (dim_cell("manual"), dim_cell("-")),
            None => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(source).add_attribute(Attribute::Bold),
            match target {
                Some(target) => Cell::new(target).fg(Color::Blue),
                None => dim_cell("(unmapped)"),
            },
            confidence,
            matcher,
        ]);
    }
    println!("{table}");

    let summary = dataset.summary();
    println!(
        "Mapped {}/{} fields ({} of {} required): {}",
        summary.mapped,
        summary.total_fields,
        summary.required_mapped,
        summary.required_total,
        summary.status.as_str()
    );
    let missing: Vec<&str> = dataset
        .target_fields()
        .iter()
        .filter(|field| field.required && !dataset.mapping().is_target_mapped(&field.id))
        .map(|field| field.id.as_str())
        .collect();
    if !missing.is_empty() {
        println!("Required fields without a column: {}", missing.join(", "));
    }
}

/// Print the validation counts and up to `max_errors` errors.
pub fn print_validation(report: &ValidationReport, scope: &str, max_errors: usize) {
    println!(
        "Validated {} {scope} rows: {} valid, {} invalid",
        report.total(),
        report.valid_count(),
        report.invalid_count()
    );
    if report.is_empty() {
        return;
    }

    let mut counts = Table::new();
    counts.set_header(vec![header_cell("Kind"), header_cell("Count")]);
    apply_table_style(&mut counts);
    align_column(&mut counts, 1, CellAlignment::Right);
    for (kind, count) in report.counts_by_kind() {
        counts.add_row(vec![kind_cell(kind), count_cell(count, Color::Red)]);
    }
    println!("{counts}");

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for error in report.errors().iter().take(max_errors) {
        table.add_row(error_row(error));
    }
    println!();
    println!("Errors:");
    println!("{table}");
    let hidden = report.errors().len().saturating_sub(max_errors);
    if hidden > 0 {
        println!("... {hidden} more (raise --max-errors to list them)");
    }
}

pub fn print_commit_outcome(outcome: &CommitOutcome, output: &Path) {
    println!("Output: {}", output.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("State"),
        header_cell("Committed"),
        header_cell("Skipped"),
        header_cell("Errors"),
        header_cell("Duration"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 1..5 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    table.add_row(vec![
        state_cell(&outcome.state),
        count_cell(outcome.committed_count, Color::Green),
        count_cell(outcome.skipped_count, Color::Yellow),
        count_cell(outcome.error_count, Color::Red),
        Cell::new(format!("{} ms", outcome.duration_ms)),
    ]);
    println!("{table}");

    let errored: Vec<(usize, &str)> = outcome
        .fates
        .iter()
        .filter_map(|(index, fate)| match fate {
            RowFate::ErroredAtCommit { reason } => Some((*index, reason.as_str())),
            _ => None,
        })
        .collect();
    if !errored.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Row"), header_cell("Reason")]);
        apply_issue_table_style(&mut table);
        align_column(&mut table, 0, CellAlignment::Right);
        for (index, reason) in errored {
            table.add_row(vec![Cell::new(index), Cell::new(reason)]);
        }
        println!();
        println!("Rows that failed to commit:");
        println!("{table}");
    }

    let retry = outcome.retry_selection();
    if !retry.is_empty() && !matches!(outcome.state, CommitState::Completed) {
        println!("{} rows were not attempted; rerun with --select to retry them.", retry.len());
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn error_row(error: &ValidationError) -> Vec<Cell> {
    vec![
        match error.row_index {
            Some(index) => Cell::new(index),
            None => Cell::new("dataset")
                .fg(Color::Magenta)
                .add_attribute(Attribute::Bold),
        },
        match &error.target_field_id {
            Some(field) => Cell::new(field),
            None => dim_cell("-"),
        },
        kind_cell(error.kind),
        Cell::new(&error.message),
    ]
}

fn kind_cell(kind: ValidationErrorKind) -> Cell {
    let color = match kind {
        ValidationErrorKind::RequiredMissing | ValidationErrorKind::DuplicateMapping => Color::Red,
        ValidationErrorKind::TypeMismatch | ValidationErrorKind::OutOfRange => Color::Yellow,
        ValidationErrorKind::General => Color::DarkGrey,
    };
    Cell::new(kind.as_str()).fg(color)
}

fn confidence_cell(confidence: f32, level: ConfidenceLevel) -> Cell {
    let color = match level {
        ConfidenceLevel::High => Color::Green,
        ConfidenceLevel::Medium => Color::Yellow,
        ConfidenceLevel::Low => Color::Red,
    };
    Cell::new(format!("{:.0}%", confidence * 100.0)).fg(color)
}

fn state_cell(state: &CommitState) -> Cell {
    let color = match state {
        CommitState::Completed => Color::Green,
        CommitState::Cancelled => Color::Yellow,
        CommitState::Failed { .. } => Color::Red,
        CommitState::Idle | CommitState::Running => Color::DarkGrey,
    };
    Cell::new(state.to_string())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn required_cell(required: bool) -> Cell {
    if required {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn range_cell(min: Option<f64>, max: Option<f64>) -> Cell {
    match (min, max) {
        (None, None) => dim_cell("-"),
        (Some(min), None) => Cell::new(format!(">= {min}")),
        (None, Some(max)) => Cell::new(format!("<= {max}")),
        (Some(min), Some(max)) => Cell::new(format!("{min}..{max}")),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}
