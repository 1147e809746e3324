//! Parser configuration.

/// Default number of data rows kept in a preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Options controlling how a delimited file is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Explicit delimiter; sniffed when `None`.
    pub delimiter: Option<u8>,
    /// Content type reported by the caller, e.g. `text/csv`.
    pub content_type: Option<String>,
    /// Number of data rows kept in [`ParsedTable::preview_rows`].
    ///
    /// [`ParsedTable::preview_rows`]: crate::ParsedTable::preview_rows
    pub preview_rows: usize,
    /// Number of non-empty lines sampled for delimiter sniffing.
    pub sniff_lines: usize,
    /// Number of leading non-empty records searched for the header row.
    pub max_header_probe: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            content_type: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            sniff_lines: 20,
            max_header_probe: 5,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn with_sniff_lines(mut self, lines: usize) -> Self {
        self.sniff_lines = lines.max(1);
        self
    }

    pub fn with_max_header_probe(mut self, records: usize) -> Self {
        self.max_header_probe = records.max(1);
        self
    }

    /// Delimiter implied by the content type, if any.
    pub(crate) fn content_type_delimiter(&self) -> Option<u8> {
        let content_type = self.content_type.as_deref()?;
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "text/tab-separated-values" => Some(b'\t'),
            "text/csv" | "application/csv" => Some(b','),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.preview_rows, 10);
        assert_eq!(options.sniff_lines, 20);
        assert_eq!(options.max_header_probe, 5);
        assert!(options.delimiter.is_none());
    }

    #[test]
    fn test_content_type_delimiter() {
        let tsv = ParseOptions::new().with_content_type("text/tab-separated-values; charset=utf-8");
        assert_eq!(tsv.content_type_delimiter(), Some(b'\t'));

        let csv = ParseOptions::new().with_content_type("TEXT/CSV");
        assert_eq!(csv.content_type_delimiter(), Some(b','));

        let other = ParseOptions::new().with_content_type("application/octet-stream");
        assert_eq!(other.content_type_delimiter(), None);
    }
}
