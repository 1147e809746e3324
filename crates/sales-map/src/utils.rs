//! Utility functions for mapping operations.

/// Normalizes text for comparison by lowercasing and replacing separators
/// and symbols with single spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized words of a header or schema term.
pub fn tokens(raw: &str) -> Vec<String> {
    normalize_text(raw)
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
