//! Header row detection and normalization.

use std::collections::BTreeSet;

use sales_model::coerce::parse_number;

/// Normalizes a header cell: BOM stripped, trimmed, inner whitespace collapsed.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes a header record into unique, non-empty column names.
///
/// Blank cells become `Column N` (1-based position); repeated names get
/// ` (2)`, ` (3)`, ... suffixes in order of appearance.
pub fn normalize_headers<'a>(cells: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut headers = Vec::new();

    for (idx, cell) in cells.into_iter().enumerate() {
        let mut base = normalize_header(cell);
        if base.is_empty() {
            base = format!("Column {}", idx + 1);
        }
        let mut name = base.clone();
        let mut suffix = 2;
        while seen.contains(&name) {
            name = format!("{base} ({suffix})");
            suffix += 1;
        }
        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}

#[derive(Debug, Default, Clone, Copy)]
struct RowStats {
    total: usize,
    non_empty: usize,
    numeric: usize,
    alpha: usize,
}

impl RowStats {
    fn non_empty_ratio(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.non_empty as f64 / self.total as f64
        }
    }

    fn numeric_ratio(self) -> f64 {
        if self.non_empty == 0 {
            0.0
        } else {
            self.numeric as f64 / self.non_empty as f64
        }
    }

    fn alpha_ratio(self) -> f64 {
        if self.non_empty == 0 {
            0.0
        } else {
            self.alpha as f64 / self.non_empty as f64
        }
    }
}

fn row_stats(row: &[String], width: usize) -> RowStats {
    let mut stats = RowStats {
        total: width.max(row.len()),
        ..RowStats::default()
    };
    for cell in row {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        stats.non_empty += 1;
        if parse_number(trimmed).is_some() || is_date_shaped(trimmed) {
            stats.numeric += 1;
        }
        if trimmed.chars().any(char::is_alphabetic) {
            stats.alpha += 1;
        }
    }
    stats
}

/// Digits and date separators only, e.g. `2024-01-31` or `31.01.2024`.
fn is_date_shaped(value: &str) -> bool {
    value.chars().any(|ch| ch.is_ascii_digit())
        && value
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '/' | '.' | ':' | ' ' | 'T'))
}

/// Title lines, notes and mostly blank lines above the header.
fn is_preamble(stats: RowStats) -> bool {
    stats.non_empty_ratio() < 0.5
}

fn is_data_like(stats: RowStats) -> bool {
    stats.numeric_ratio() >= 0.2
}

fn is_header_like(stats: RowStats) -> bool {
    stats.non_empty_ratio() >= 0.8 && stats.alpha_ratio() >= 0.5 && stats.numeric_ratio() <= 0.1
}

/// Index of the header row among the leading records.
///
/// Heuristic: skip preamble lines, find where data starts, then pick the
/// last header-like row before it (falling back to the last substantive
/// row). Without any data-like row the first substantive row is the header.
/// `None` when the first substantive row already looks like data.
pub fn detect_header_row(rows: &[Vec<String>]) -> Option<usize> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let stats: Vec<RowStats> = rows.iter().map(|row| row_stats(row, width)).collect();

    let substantive: Vec<usize> = (0..stats.len())
        .filter(|&idx| !is_preamble(stats[idx]))
        .collect();
    // Every probed row is sparse: the widest one is the best guess.
    if substantive.is_empty() {
        return rows.iter().position(|row| row.len() == width && width > 0);
    }

    let data_index = substantive
        .iter()
        .copied()
        .find(|&idx| is_data_like(stats[idx]));
    let Some(data_index) = data_index else {
        return substantive.first().copied();
    };

    let before_data = substantive.iter().copied().filter(|&idx| idx < data_index);
    let mut candidate = None;
    let mut header_like = None;
    for idx in before_data {
        candidate = Some(idx);
        if is_header_like(stats[idx]) {
            header_like = Some(idx);
        }
    }
    header_like.or(candidate)
}
