//! Delimiter sniffing.

use std::collections::BTreeMap;

/// Delimiters considered when none is given, in preference order.
pub const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Human-readable name of a delimiter byte.
pub fn delimiter_name(delimiter: u8) -> String {
    match delimiter {
        b',' => "comma".to_string(),
        b';' => "semicolon".to_string(),
        b'\t' => "tab".to_string(),
        b'|' => "pipe".to_string(),
        other => format!("{:?}", other as char),
    }
}

/// Occurrences of `delimiter` outside double quotes.
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Fraction of lines agreeing on the most common non-zero count.
///
/// `None` when the delimiter never occurs.
fn consistency(lines: &[&str], delimiter: u8) -> Option<f64> {
    let mut frequencies: BTreeMap<usize, usize> = BTreeMap::new();
    for line in lines {
        let count = count_unquoted(line, delimiter);
        if count > 0 {
            *frequencies.entry(count).or_default() += 1;
        }
    }
    let mode_frequency = frequencies.values().copied().max()?;
    Some(mode_frequency as f64 / lines.len() as f64)
}

/// Pick the delimiter of the sampled lines.
///
/// The candidate whose per-line count is non-zero and most consistent wins.
/// Ties prefer `hint`, then [`DELIMITER_CANDIDATES`] order. Returns `hint`
/// (or a comma) when no candidate occurs at all, i.e. single-column input.
pub fn sniff_delimiter(lines: &[&str], hint: Option<u8>) -> u8 {
    let lines: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| !line.trim().is_empty())
        .collect();
    let fallback = hint.unwrap_or(b',');
    if lines.is_empty() {
        return fallback;
    }

    // A tab-separated hint wins outright once a tab shows up.
    if hint == Some(b'\t') && lines.iter().any(|line| line.contains('\t')) {
        return b'\t';
    }

    let mut best: Option<(u8, f64)> = None;
    for candidate in DELIMITER_CANDIDATES {
        let Some(score) = consistency(&lines, candidate) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((current, best_score)) => {
                score > best_score
                    || (score == best_score && hint == Some(candidate) && hint != Some(current))
            }
        };
        if better {
            best = Some((candidate, score));
        }
    }

    let delimiter = best.map_or(fallback, |(delimiter, _)| delimiter);
    tracing::debug!(
        delimiter = %delimiter_name(delimiter),
        sampled = lines.len(),
        "sniffed delimiter"
    );
    delimiter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma() {
        let lines = ["Date,Amount,Qty", "2024-01-01,12.50,3", "2024-01-02,8.00,1"];
        assert_eq!(sniff_delimiter(&lines, None), b',');
    }

    #[test]
    fn test_semicolon_with_decimal_commas() {
        let lines = ["Date;Amount", "2024-01-01;12,50", "2024-01-02;8,00"];
        assert_eq!(sniff_delimiter(&lines, None), b';');
    }

    #[test]
    fn test_quoted_delimiters_are_ignored() {
        let lines = [
            "Name|Note",
            "\"Smith, J\"|\"a, b, c\"",
            "\"Doe, A\"|plain",
        ];
        assert_eq!(sniff_delimiter(&lines, None), b'|');
    }

    #[test]
    fn test_tab_hint() {
        let lines = ["Date\tAmount, USD", "2024-01-01\t12"];
        assert_eq!(sniff_delimiter(&lines, Some(b'\t')), b'\t');
    }

    #[test]
    fn test_tie_prefers_hint_then_order() {
        let lines = ["a,b;c", "1,2;3"];
        assert_eq!(sniff_delimiter(&lines, None), b',');
        assert_eq!(sniff_delimiter(&lines, Some(b';')), b';');
    }

    #[test]
    fn test_single_column_falls_back() {
        assert_eq!(sniff_delimiter(&["Amount", "12"], None), b',');
        assert_eq!(sniff_delimiter(&[], Some(b';')), b';');
    }

    #[test]
    fn test_delimiter_name() {
        assert_eq!(delimiter_name(b'\t'), "tab");
        assert_eq!(delimiter_name(b':'), "':'");
    }
}
