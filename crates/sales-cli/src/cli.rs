//! CLI argument definitions for the sales importer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use sales_cli::args::{RowSpans, parse_delimiter, parse_map_entry, parse_selection};
use sales_cli::logging::LogFormat;
use sales_commit::DEFAULT_BATCH_SIZE;
use sales_ingest::DEFAULT_PREVIEW_ROWS;

#[derive(Parser)]
#[command(
    name = "sales-import",
    version,
    about = "Sales Import - Map and load sales files of unknown shape",
    long_about = "Map delimiter-separated sales exports onto the sales schema.\n\n\
                  Detects the delimiter and header row, suggests a column mapping,\n\
                  validates every row and commits the valid ones as JSON Lines."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in log output.
    ///
    /// Sales rows carry customer names and contact details, so values are
    /// redacted unless this flag is given.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the fields of the target schema.
    Fields(FieldsArgs),

    /// Show the detected structure and the first rows of a file.
    Preview(ParseArgs),

    /// Suggest a column mapping for a file.
    Detect(DetectArgs),

    /// Validate a file under a mapping.
    Validate(ValidateArgs),

    /// Validate a file and commit its rows to a JSON Lines file.
    Commit(CommitArgs),
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Schema definition CSV (default: built-in sales schema).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,
}

/// How to read the input file.
#[derive(Args)]
pub struct ParseArgs {
    /// Delimited sales file to import.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Schema definition CSV (default: built-in sales schema).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Force the delimiter instead of sniffing it (`,` `;` `tab` `|`).
    #[arg(long = "delimiter", value_name = "DELIM", value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Content type hint such as `text/tab-separated-values`.
    #[arg(long = "content-type", value_name = "MIME")]
    pub content_type: Option<String>,

    /// Rows to keep in the preview.
    #[arg(long = "preview-rows", value_name = "N", default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview_rows: usize,
}

/// How to build the mapping.
#[derive(Args)]
pub struct MappingArgs {
    /// Saved mapping (JSON object of column to field).
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Skip automatic mapping detection.
    #[arg(long = "no-auto")]
    pub no_auto: bool,

    /// Map a column onto a field, e.g. `--map "Sold On=date"`.
    #[arg(long = "map", value_name = "SOURCE=FIELD", value_parser = parse_map_entry)]
    pub map: Vec<(String, String)>,

    /// Remove the mapping of a column.
    #[arg(long = "unmap", value_name = "SOURCE")]
    pub unmap: Vec<String>,

    /// Write the final mapping to a file for reuse with `--mapping`.
    #[arg(long = "save-mapping", value_name = "PATH")]
    pub save_mapping: Option<PathBuf>,
}

#[derive(Args)]
pub struct DetectArgs {
    #[command(flatten)]
    pub parse: ParseArgs,

    /// Write the suggested mapping to a file.
    #[arg(long = "save-mapping", value_name = "PATH")]
    pub save_mapping: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub parse: ParseArgs,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Validate every row of the file, not just the preview.
    #[arg(long = "full")]
    pub full: bool,

    /// Maximum number of errors to list.
    #[arg(long = "max-errors", value_name = "N", default_value_t = 50)]
    pub max_errors: usize,
}

#[derive(Args)]
pub struct CommitArgs {
    #[command(flatten)]
    pub parse: ParseArgs,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Destination JSON Lines file.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Rows to commit, e.g. `0,3,5-9` (default: every valid row).
    ///
    /// Selected rows that fail validation are attempted and reported as
    /// errors instead of being skipped.
    #[arg(long = "select", value_name = "ROWS", value_parser = parse_selection)]
    pub select: Option<RowSpans>,

    /// Rows per sink batch.
    ///
    /// Each batch is flushed before its rows count as committed; Ctrl-C stops
    /// the run after the batch in flight.
    #[arg(long = "batch-size", value_name = "N", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
