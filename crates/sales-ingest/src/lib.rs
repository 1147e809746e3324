//! Sales data ingestion.
//!
//! Parses delimiter-separated files of unknown structure into [`Row`]s:
//!
//! - **Delimiter sniffing** over `,` `;` tab and `|`
//! - **Header detection** that skips title and preamble lines
//! - **Streaming** record by record through [`RowReader`], with only a bounded
//!   preview materialized by [`parse_preview`]
//! - **Column profiles** (the inferred preview schema)
//! - **Fingerprinting** of the consumed bytes with SHA-256
//!
//! # Example
//!
//! ```ignore
//! use sales_ingest::{ParseOptions, parse_path};
//!
//! let table = parse_path(Path::new("orders.csv"), &ParseOptions::default())?;
//! println!("{} rows, delimiter {:?}", table.total_row_count, table.delimiter as char);
//! ```
//!
//! [`Row`]: sales_model::Row

mod error;
mod fingerprint;
mod header;
mod options;
mod profile;
mod reader;
mod sniff;

// === Error Types ===
pub use error::{IngestError, Result};

// === Options ===
pub use options::{DEFAULT_PREVIEW_ROWS, ParseOptions};

// === Parsing ===
pub use reader::{
    ParsedTable, RowReader, parse_bytes, parse_path, parse_preview, read_all_rows,
    read_all_rows_from_path,
};
pub use sniff::{DELIMITER_CANDIDATES, delimiter_name, sniff_delimiter};

// === Profiles ===
pub use profile::{DEFAULT_SAMPLE_LIMIT, build_column_profiles};

// === Fingerprint ===
pub use fingerprint::{HashingReader, fingerprint_bytes};
