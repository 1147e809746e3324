//! Streaming reader for delimited sales files.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Chain, Cursor, Read};
use std::path::Path;

use csv::StringRecord;
use sales_model::{ColumnProfile, Row, SourceColumn};

use crate::error::{IngestError, Result};
use crate::fingerprint::HashingReader;
use crate::header::{detect_header_row, normalize_headers};
use crate::options::ParseOptions;
use crate::profile::{DEFAULT_SAMPLE_LIMIT, build_column_profiles};
use crate::sniff::{delimiter_name, sniff_delimiter};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

type Source<R> = Chain<Cursor<Vec<u8>>, BufReader<HashingReader<R>>>;

/// Result of parsing a file: headers, a bounded preview and stream statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    /// Normalized, unique column names in file order.
    pub headers: Vec<SourceColumn>,
    /// First data rows, at most [`ParseOptions::preview_rows`].
    pub preview_rows: Vec<Row>,
    /// Number of data rows in the whole file.
    pub total_row_count: usize,
    pub delimiter: u8,
    /// 1-based line number of the header row.
    pub header_line: u64,
    /// Inferred preview schema, one profile per header.
    pub profiles: Vec<ColumnProfile>,
    /// Lowercase hex SHA-256 of the input bytes.
    pub fingerprint: String,
    /// Rows that had fewer cells than headers and were padded.
    pub padded_rows: usize,
    /// Rows that had more cells than headers; extra cells were dropped.
    pub truncated_rows: usize,
}

impl ParsedTable {
    pub fn profile(&self, column: &str) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.name == column)
    }
}

/// Streaming iterator over the data rows of a delimited file.
///
/// Construction sniffs the delimiter and detects the header row from the
/// leading lines; rows are then decoded one record at a time. Row indices
/// are 0-based among data rows, with blank lines excluded.
pub struct RowReader<R: Read> {
    records: csv::Reader<Source<R>>,
    headers: Vec<SourceColumn>,
    pending: VecDeque<StringRecord>,
    delimiter: u8,
    header_line: u64,
    next_index: usize,
    padded_rows: usize,
    truncated_rows: usize,
    finished: bool,
}

impl<R: Read> RowReader<R> {
    pub fn new(reader: R, options: &ParseOptions) -> Result<Self> {
        let mut input = BufReader::new(HashingReader::new(reader));
        let prefix = read_prefix(&mut input, options.sniff_lines)?;

        let delimiter = match options.delimiter {
            Some(delimiter) => delimiter,
            None => {
                let text = std::str::from_utf8(&prefix).map_err(|_| IngestError::CsvParse {
                    line: None,
                    message: "input is not valid UTF-8".to_string(),
                })?;
                let lines: Vec<&str> = text.lines().collect();
                sniff_delimiter(&lines, options.content_type_delimiter())
            }
        };

        let mut records = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(Cursor::new(prefix).chain(input));

        let probe_limit = options.max_header_probe.max(1);
        let mut probe = Vec::with_capacity(probe_limit);
        while probe.len() < probe_limit {
            match next_record(&mut records)? {
                Some(record) => probe.push(record),
                None => break,
            }
        }
        if probe.is_empty() {
            return Err(IngestError::EmptyInput);
        }

        let cells: Vec<Vec<String>> = probe
            .iter()
            .map(|record| record.iter().map(str::to_string).collect())
            .collect();
        let header_idx = detect_header_row(&cells).ok_or(IngestError::NoHeaderDetected {
            probed: probe.len(),
        })?;
        if header_idx > 0 {
            tracing::debug!(skipped = header_idx, "skipped preamble lines above header");
        }

        let header_record = &probe[header_idx];
        let header_line = header_record.position().map_or(1, csv::Position::line);
        let headers = normalize_headers(header_record.iter())
            .into_iter()
            .map(SourceColumn::new)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| IngestError::CsvParse {
                line: Some(header_line),
                message: e.to_string(),
            })?;

        tracing::debug!(
            delimiter = %delimiter_name(delimiter),
            header_line,
            columns = headers.len(),
            "detected table layout"
        );

        Ok(Self {
            records,
            headers,
            pending: probe.into_iter().skip(header_idx + 1).collect(),
            delimiter,
            header_line,
            next_index: 0,
            padded_rows: 0,
            truncated_rows: 0,
            finished: false,
        })
    }

    pub fn headers(&self) -> &[SourceColumn] {
        &self.headers
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn header_line(&self) -> u64 {
        self.header_line
    }

    /// Data rows yielded so far.
    pub fn rows_read(&self) -> usize {
        self.next_index
    }

    pub fn padded_rows(&self) -> usize {
        self.padded_rows
    }

    pub fn truncated_rows(&self) -> usize {
        self.truncated_rows
    }

    /// Fingerprint of the input, available once the stream is exhausted.
    pub fn fingerprint(&self) -> Option<String> {
        if !self.finished {
            return None;
        }
        let (_, input) = self.records.get_ref().get_ref();
        Some(input.get_ref().hex_digest())
    }

    fn to_row(&mut self, record: &StringRecord) -> Row {
        let width = self.headers.len();
        if record.len() < width {
            self.padded_rows += 1;
        } else if record.len() > width {
            self.truncated_rows += 1;
            tracing::warn!(
                line = record.position().map(csv::Position::line),
                cells = record.len(),
                columns = width,
                "row has more cells than headers; extra cells dropped"
            );
        }
        let values: Vec<&str> = record.iter().take(width).collect();
        let row = Row::from_values(self.next_index, &self.headers, &values);
        self.next_index += 1;
        row
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.pending.pop_front() {
            return Some(Ok(self.to_row(&record)));
        }
        if self.finished {
            return None;
        }
        match next_record(&mut self.records) {
            Ok(Some(record)) => Some(Ok(self.to_row(&record))),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Reads up to `lines` non-blank lines, rejecting UTF-16 input and
/// dropping a UTF-8 byte order mark.
fn read_prefix<B: BufRead>(input: &mut B, lines: usize) -> Result<Vec<u8>> {
    let mut prefix = Vec::new();
    let mut non_blank = 0;
    while non_blank < lines.max(1) {
        let start = prefix.len();
        let read = input
            .read_until(b'\n', &mut prefix)
            .map_err(IngestError::Read)?;
        if read == 0 {
            break;
        }
        if start == 0 {
            check_encoding(&prefix)?;
        }
        if prefix[start..].iter().any(|b| !b.is_ascii_whitespace()) {
            non_blank += 1;
        }
    }

    if prefix.starts_with(UTF8_BOM) {
        prefix.drain(..UTF8_BOM.len());
    }
    if prefix.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptyInput);
    }
    Ok(prefix)
}

fn check_encoding(head: &[u8]) -> Result<()> {
    if head.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        });
    }
    if head.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 BE",
        });
    }
    Ok(())
}

/// Next record with at least one non-blank cell.
fn next_record<R: Read>(records: &mut csv::Reader<R>) -> Result<Option<StringRecord>> {
    let mut record = StringRecord::new();
    loop {
        let more = records
            .read_record(&mut record)
            .map_err(|e| IngestError::from_csv(&e))?;
        if !more {
            return Ok(None);
        }
        if record.iter().any(|cell| !cell.trim().is_empty()) {
            return Ok(Some(record));
        }
    }
}

/// Parses headers, a bounded preview and statistics from a stream.
///
/// The whole input is consumed to count rows and fingerprint it, but only
/// the first [`ParseOptions::preview_rows`] rows are kept.
pub fn parse_preview<R: Read>(reader: R, options: &ParseOptions) -> Result<ParsedTable> {
    let mut rows = RowReader::new(reader, options)?;
    let mut preview_rows = Vec::with_capacity(options.preview_rows);
    let mut total_row_count = 0;

    for row in rows.by_ref() {
        let row = row?;
        if preview_rows.len() < options.preview_rows {
            preview_rows.push(row);
        }
        total_row_count += 1;
    }

    let fingerprint = rows.fingerprint().unwrap_or_default();
    let profiles = build_column_profiles(rows.headers(), &preview_rows, DEFAULT_SAMPLE_LIMIT);

    if rows.padded_rows() > 0 || rows.truncated_rows() > 0 {
        tracing::warn!(
            padded = rows.padded_rows(),
            truncated = rows.truncated_rows(),
            "rows did not match the header width"
        );
    }
    tracing::info!(
        columns = rows.headers().len(),
        rows = total_row_count,
        delimiter = %delimiter_name(rows.delimiter()),
        "parsed input"
    );

    Ok(ParsedTable {
        headers: rows.headers().to_vec(),
        preview_rows,
        total_row_count,
        delimiter: rows.delimiter(),
        header_line: rows.header_line(),
        profiles,
        fingerprint,
        padded_rows: rows.padded_rows(),
        truncated_rows: rows.truncated_rows(),
    })
}

/// Parses an in-memory buffer.
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> Result<ParsedTable> {
    parse_preview(bytes, options)
}

/// Parses a file on disk.
pub fn parse_path(path: &Path, options: &ParseOptions) -> Result<ParsedTable> {
    parse_preview(open_file(path)?, options)
}

/// Reads every data row of a stream, e.g. the full set for a commit.
pub fn read_all_rows<R: Read>(reader: R, options: &ParseOptions) -> Result<Vec<Row>> {
    RowReader::new(reader, options)?.collect()
}

pub fn read_all_rows_from_path(path: &Path, options: &ParseOptions) -> Result<Vec<Row>> {
    read_all_rows(open_file(path)?, options)
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_prefix_strips_bom() {
        let mut input = Cursor::new(b"\xEF\xBB\xBFa,b\n1,2\n".to_vec());
        let prefix = read_prefix(&mut input, 20).unwrap();
        assert_eq!(prefix, b"a,b\n1,2\n");
    }

    #[test]
    fn test_read_prefix_stops_after_sample() {
        let mut input = Cursor::new(b"a\n\nb\nc\nd\n".to_vec());
        let prefix = read_prefix(&mut input, 2).unwrap();
        assert_eq!(prefix, b"a\n\nb\n");
    }

    #[test]
    fn test_read_prefix_rejects_utf16() {
        let mut input = Cursor::new(vec![0xFF, 0xFE, b'a', 0]);
        assert!(matches!(
            read_prefix(&mut input, 20),
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE"
            })
        ));
    }

    #[test]
    fn test_read_prefix_blank_input() {
        let mut input = Cursor::new(b"\n  \n\r\n".to_vec());
        assert!(matches!(
            read_prefix(&mut input, 20),
            Err(IngestError::EmptyInput)
        ));
    }

    #[test]
    fn test_rows_stream_with_pending_probe() {
        let data = b"Date,Amount\n2024-01-01,1\n2024-01-02,2\n2024-01-03,3\n2024-01-04,4\n2024-01-05,5\n2024-01-06,6\n";
        let rows: Vec<Row> = RowReader::new(&data[..], &ParseOptions::default())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[5].value("Amount"), "6");
    }

    #[test]
    fn test_fingerprint_only_after_exhaustion() {
        let data = b"Date,Amount\n2024-01-01,1\n";
        let mut reader = RowReader::new(&data[..], &ParseOptions::default()).unwrap();
        assert!(reader.fingerprint().is_none());
        while reader.next().is_some() {}
        assert_eq!(
            reader.fingerprint(),
            Some(crate::fingerprint::fingerprint_bytes(data))
        );
    }
}
