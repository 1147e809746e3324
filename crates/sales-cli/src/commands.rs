use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use sales_cli::session::{
    MappingEdits, apply_mapping_edits, load_registry, open_dataset, parse_options,
    write_mapping_file,
};
use sales_commit::{CommitOutcome, CommitUpdate, JsonLinesSink, spawn_commit};
use sales_core::Dataset;
use sales_ingest::{ParseOptions, parse_path, read_all_rows_from_path};
use sales_map::AutoMapper;
use sales_validate::{ValidationReport, validate_with_columns};

use crate::cli::{CommitArgs, DetectArgs, FieldsArgs, MappingArgs, ParseArgs, ValidateArgs};
use crate::summary::{
    print_commit_outcome, print_fields, print_mapping, print_preview, print_validation,
};

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let registry = load_registry(args.schema.as_deref())?;
    print_fields(registry.fields());
    Ok(())
}

pub fn run_preview(args: &ParseArgs) -> Result<()> {
    let options = options_from(args);
    let table = parse_path(&args.file, &options)
        .with_context(|| format!("parse {}", args.file.display()))?;
    print_preview(&table);
    Ok(())
}

pub fn run_detect(args: &DetectArgs) -> Result<()> {
    let (mut dataset, _) = open(&args.parse)?;
    let result = dataset.auto_detect(&AutoMapper::default());
    if let Some(confidence) = result.mean_confidence() {
        info!(mean_confidence = confidence, "mapping suggested");
    }
    print_mapping(&dataset);
    if let Some(path) = &args.save_mapping {
        write_mapping_file(path, &dataset)?;
    }
    Ok(())
}

/// Validation result plus the scope it covers.
pub struct ValidateResult {
    pub report: ValidationReport,
    pub full: bool,
}

pub fn run_validate(args: &ValidateArgs) -> Result<ValidateResult> {
    let (dataset, options) = open_mapped(&args.parse, &args.mapping)?;
    print_mapping(&dataset);
    println!();
    let report = if args.full {
        let span = info_span!("validate_full", file = %args.parse.file.display());
        let _guard = span.enter();
        let rows = read_all_rows_from_path(&args.parse.file, &options)
            .with_context(|| format!("read {}", args.parse.file.display()))?;
        validate_with_columns(
            &rows,
            Some(dataset.source_columns()),
            dataset.mapping(),
            dataset.target_fields(),
        )
    } else {
        dataset.validation().clone()
    };
    Ok(ValidateResult {
        report,
        full: args.full,
    })
}

pub fn print_validate_result(result: &ValidateResult, max_errors: usize) {
    let scope = if result.full { "file" } else { "preview" };
    print_validation(&result.report, scope, max_errors);
}

pub fn run_commit(args: &CommitArgs) -> Result<CommitOutcome> {
    let (mut dataset, options) = open_mapped(&args.parse, &args.mapping)?;
    print_mapping(&dataset);
    println!();
    if let Some(spans) = &args.select {
        dataset.select_many(spans.indices()).context("apply row selection")?;
    }

    let commit_span = info_span!("commit", file = %args.parse.file.display());
    let _commit_guard = commit_span.enter();
    let rows = read_all_rows_from_path(&args.parse.file, &options)
        .with_context(|| format!("read {}", args.parse.file.display()))?;
    if rows.len() != dataset.total_row_count() {
        warn!(
            previewed = dataset.total_row_count(),
            read = rows.len(),
            "row count changed since the file was opened"
        );
    }
    let request = dataset.commit_request(rows, args.batch_size);
    let sink = JsonLinesSink::create(&args.output)
        .with_context(|| format!("create {}", args.output.display()))?
        .with_fingerprint(dataset.fingerprint());

    let (sender, receiver) = crossbeam_channel::unbounded();
    let (handle, join) = spawn_commit(request, sink, sender);
    let interrupted = ctrlc::set_handler(move || {
        if !handle.is_cancelled() {
            eprintln!("interrupted, stopping after the current batch");
            handle.cancel();
        }
    });
    if let Err(error) = interrupted {
        warn!(%error, "Ctrl-C will not cancel the commit");
    }
    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    progress.set_style(progress_style()?);
    progress.enable_steady_tick(Duration::from_millis(120));

    for update in receiver {
        match update {
            CommitUpdate::Started { total } => progress.set_length(total as u64),
            CommitUpdate::Progress(step) => progress.set_position(step.processed as u64),
            CommitUpdate::Finished(_) => break,
        }
    }
    progress.finish_and_clear();

    let (_sink, result) = join
        .join()
        .map_err(|_| anyhow!("commit worker panicked"))?;
    let outcome = result.context("commit rows")?;
    Ok(outcome)
}

fn progress_style() -> Result<ProgressStyle> {
    let style = ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rows",
    )
    .context("progress template")?
    .progress_chars("=> ");
    Ok(style)
}

fn options_from(args: &ParseArgs) -> ParseOptions {
    parse_options(args.delimiter, args.content_type.as_deref(), args.preview_rows)
}

fn open(args: &ParseArgs) -> Result<(Dataset, ParseOptions)> {
    let registry = load_registry(args.schema.as_deref())?;
    let options = options_from(args);
    let dataset = open_dataset(&args.file, &options, &registry)?;
    Ok((dataset, options))
}

fn open_mapped(parse: &ParseArgs, mapping: &MappingArgs) -> Result<(Dataset, ParseOptions)> {
    let (mut dataset, options) = open(parse)?;
    let edits = MappingEdits {
        auto_detect: !mapping.no_auto,
        mapping_file: mapping.mapping.clone(),
        unmap: mapping.unmap.clone(),
        map: mapping.map.clone(),
    };
    apply_mapping_edits(&mut dataset, &edits, &AutoMapper::default())?;
    if let Some(path) = &mapping.save_mapping {
        write_mapping_file(path, &dataset)?;
    }
    Ok((dataset, options))
}
