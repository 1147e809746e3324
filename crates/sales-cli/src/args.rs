//! Parsers for compact command-line values.
//!
//! Each returns `Result<_, String>` so it can be used as a clap
//! `value_parser`.

use std::ops::RangeInclusive;

/// Row numbers given as single rows and inclusive ranges.
///
/// Ranges stay unexpanded, so `0-4000000000` costs nothing until the rows
/// are checked against the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpans(Vec<RangeInclusive<usize>>);

impl RowSpans {
    /// Row indices in the order given, duplicates included.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().flat_map(|span| span.clone())
    }
}

/// Parse a row selection such as `0,3,5-9`.
///
/// Ranges are inclusive; whitespace around items is ignored.
pub fn parse_selection(value: &str) -> Result<RowSpans, String> {
    let mut spans = Vec::new();
    for item in value.split(',').map(str::trim) {
        if item.is_empty() {
            continue;
        }
        match item.split_once('-') {
            Some((start, end)) => {
                let start = parse_index(start)?;
                let end = parse_index(end)?;
                if start > end {
                    return Err(format!("range '{item}' is reversed"));
                }
                spans.push(start..=end);
            }
            None => {
                let index = parse_index(item)?;
                spans.push(index..=index);
            }
        }
    }
    if spans.is_empty() {
        return Err("selection is empty".to_string());
    }
    Ok(RowSpans(spans))
}

fn parse_index(value: &str) -> Result<usize, String> {
    let value = value.trim();
    value
        .parse()
        .map_err(|_| format!("'{value}' is not a row number"))
}

/// Parse a `SOURCE=TARGET` mapping edit.
///
/// Splits on the last `=`, so column names containing `=` still work.
pub fn parse_map_entry(value: &str) -> Result<(String, String), String> {
    let Some((source, target)) = value.rsplit_once('=') else {
        return Err(format!("expected SOURCE=TARGET, got '{value}'"));
    };
    let source = source.trim();
    let target = target.trim();
    if source.is_empty() || target.is_empty() {
        return Err(format!("expected SOURCE=TARGET, got '{value}'"));
    }
    Ok((source.to_string(), target.to_string()))
}

/// Parse a delimiter given as a character or a name (`comma`, `semicolon`,
/// `tab`, `pipe`).
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value.to_ascii_lowercase().as_str() {
        "comma" | "," => Ok(b','),
        "semicolon" | ";" => Ok(b';'),
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "pipe" | "|" => Ok(b'|'),
        other if other.len() == 1 && other.is_ascii() => Ok(other.as_bytes()[0]),
        _ => Err(format!("unsupported delimiter '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    fn rows(value: &str) -> BTreeSet<usize> {
        parse_selection(value).unwrap().indices().collect()
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(rows("0,3,5-9"), BTreeSet::from([0, 3, 5, 6, 7, 8, 9]));
        assert_eq!(rows(" 2 , 2, 1 "), BTreeSet::from([1, 2]));
        assert!(parse_selection("9-5").is_err());
        assert!(parse_selection("a").is_err());
        assert!(parse_selection(",").is_err());
    }

    #[test]
    fn test_huge_range_is_not_expanded() {
        let spans = parse_selection(&format!("3,0-{}", usize::MAX)).unwrap();
        let first: Vec<usize> = spans.indices().take(3).collect();
        assert_eq!(first, vec![3, 0, 1]);
    }

    #[test]
    fn test_parse_map_entry() {
        assert_eq!(
            parse_map_entry("Sold On=date").unwrap(),
            ("Sold On".to_string(), "date".to_string())
        );
        assert_eq!(
            parse_map_entry("a=b=amount").unwrap(),
            ("a=b".to_string(), "amount".to_string())
        );
        assert!(parse_map_entry("date").is_err());
        assert!(parse_map_entry("=date").is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("Pipe").unwrap(), b'|');
        assert!(parse_delimiter("::").is_err());
    }
}
