//! Error types for sales data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make a file unusable as an import source.
///
/// Parse problems are fatal to the file; row-level problems are left to
/// validation.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the input file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read from the input stream.
    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),

    // === Content Errors ===
    /// Input contains no non-blank lines.
    #[error("input is empty")]
    EmptyInput,

    /// Input starts with a byte order mark of an unsupported encoding.
    #[error("unsupported encoding {encoding}; save the file as UTF-8")]
    UnsupportedEncoding { encoding: &'static str },

    /// Malformed delimited content or invalid UTF-8.
    #[error("failed to parse {}: {message}", location(.line))]
    CsvParse { line: Option<u64>, message: String },

    /// No plausible header row among the leading records.
    #[error("could not detect a header row in the first {probed} records")]
    NoHeaderDetected { probed: usize },
}

impl IngestError {
    pub(crate) fn from_csv(err: &csv::Error) -> Self {
        let line = err.position().map(csv::Position::line);
        let message = match err.kind() {
            csv::ErrorKind::Utf8 { .. } => "input is not valid UTF-8".to_string(),
            _ => err.to_string(),
        };
        Self::CsvParse { line, message }
    }
}

fn location(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!("line {line}"),
        None => "input".to_string(),
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/orders.csv"),
        };
        assert_eq!(err.to_string(), "input file not found: /path/to/orders.csv");
    }

    #[test]
    fn test_csv_parse_display() {
        let with_line = IngestError::CsvParse {
            line: Some(4),
            message: "bad quote".to_string(),
        };
        assert_eq!(with_line.to_string(), "failed to parse line 4: bad quote");

        let without_line = IngestError::CsvParse {
            line: None,
            message: "input is not valid UTF-8".to_string(),
        };
        assert_eq!(
            without_line.to_string(),
            "failed to parse input: input is not valid UTF-8"
        );
    }
}
