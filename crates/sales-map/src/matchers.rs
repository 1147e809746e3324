//! Column matcher strategies.
//!
//! Each strategy answers one question: does this header (and its sampled
//! content) look like that target field, and how sure is it? The auto-mapper
//! runs them in priority order.

use std::fmt;

use rapidfuzz::distance::jaro_winkler;
use sales_model::{ColumnProfile, FieldType, TargetField};
use serde::{Deserialize, Serialize};

use crate::utils::{normalize_text, tokens};

/// Confidence of an exact synonym match.
const SYNONYM_CONFIDENCE: f32 = 1.0;
/// Scale applied to the Jaro-Winkler similarity of a fuzzy synonym match.
const FUZZY_SCALE: f64 = 0.9;
/// Headers shorter than this are too ambiguous for fuzzy matching.
const FUZZY_MIN_LEN: usize = 4;
const KEYWORD_TOKEN_CONFIDENCE: f32 = 0.75;
const KEYWORD_PREFIX_CONFIDENCE: f32 = 0.7;
const KEYWORD_SUBSTRING_CONFIDENCE: f32 = 0.65;
/// Keywords shorter than this only match whole tokens.
const KEYWORD_SUBSTRING_MIN_LEN: usize = 4;
const CONTENT_CONFIDENCE: f32 = 0.6;

/// A single column detection strategy.
pub trait ColumnMatcher: Send + Sync {
    /// Short identifier shown next to suggestions.
    fn name(&self) -> &'static str;

    /// Confidence (0.0 to 1.0) that `header` holds values for `field`.
    fn matches(
        &self,
        header: &str,
        field: &TargetField,
        profile: Option<&ColumnProfile>,
    ) -> Option<f32>;
}

/// Built-in strategies, in default priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    Synonym,
    FuzzySynonym,
    Keyword,
    Content,
}

impl MatcherKind {
    pub const ALL: [MatcherKind; 4] = [
        MatcherKind::Synonym,
        MatcherKind::FuzzySynonym,
        MatcherKind::Keyword,
        MatcherKind::Content,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatcherKind::Synonym => "synonym",
            MatcherKind::FuzzySynonym => "fuzzy_synonym",
            MatcherKind::Keyword => "keyword",
            MatcherKind::Content => "content",
        }
    }

    pub(crate) fn build(self, fuzzy_threshold: f64) -> Box<dyn ColumnMatcher> {
        match self {
            MatcherKind::Synonym => Box::new(SynonymMatcher),
            MatcherKind::FuzzySynonym => Box::new(FuzzySynonymMatcher::new(fuzzy_threshold)),
            MatcherKind::Keyword => Box::new(KeywordMatcher),
            MatcherKind::Content => Box::new(ContentMatcher),
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names a field is known by: id, label and synonyms, normalized.
fn field_names(field: &TargetField) -> impl Iterator<Item = String> + '_ {
    std::iter::once(field.id.as_str())
        .chain(std::iter::once(field.label.as_str()))
        .chain(field.synonyms.iter().map(String::as_str))
        .map(normalize_text)
        .filter(|name| !name.is_empty())
}

// =============================================================================
// Synonym
// =============================================================================

/// Exact, case-insensitive match of the normalized header against a field's
/// id, label or synonyms.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynonymMatcher;

impl ColumnMatcher for SynonymMatcher {
    fn name(&self) -> &'static str {
        MatcherKind::Synonym.as_str()
    }

    fn matches(
        &self,
        header: &str,
        field: &TargetField,
        _profile: Option<&ColumnProfile>,
    ) -> Option<f32> {
        let header = normalize_text(header);
        if header.is_empty() {
            return None;
        }
        field_names(field)
            .any(|name| name == header)
            .then_some(SYNONYM_CONFIDENCE)
    }
}

// =============================================================================
// Fuzzy synonym
// =============================================================================

/// Jaro-Winkler similarity against a field's names; catches typos such as
/// `Quantitiy` or `Reveune`.
#[derive(Debug, Clone, Copy)]
pub struct FuzzySynonymMatcher {
    threshold: f64,
}

impl FuzzySynonymMatcher {
    pub const DEFAULT_THRESHOLD: f64 = 0.92;

    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }
}

impl Default for FuzzySynonymMatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl ColumnMatcher for FuzzySynonymMatcher {
    fn name(&self) -> &'static str {
        MatcherKind::FuzzySynonym.as_str()
    }

    fn matches(
        &self,
        header: &str,
        field: &TargetField,
        _profile: Option<&ColumnProfile>,
    ) -> Option<f32> {
        let header = normalize_text(header);
        if header.chars().count() < FUZZY_MIN_LEN {
            return None;
        }
        let best = field_names(field)
            .filter(|name| name.chars().count() >= FUZZY_MIN_LEN)
            .map(|name| jaro_winkler::similarity(header.chars(), name.chars()))
            .fold(0.0_f64, f64::max);
        (best >= self.threshold).then_some((best * FUZZY_SCALE) as f32)
    }
}

// =============================================================================
// Keyword
// =============================================================================

/// Keyword found in the header text.
///
/// A keyword equal to a header word beats a word starting with it, which
/// beats a keyword buried inside a word (`OrderDate`).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher;

impl ColumnMatcher for KeywordMatcher {
    fn name(&self) -> &'static str {
        MatcherKind::Keyword.as_str()
    }

    fn matches(
        &self,
        header: &str,
        field: &TargetField,
        _profile: Option<&ColumnProfile>,
    ) -> Option<f32> {
        let words = tokens(header);
        if words.is_empty() {
            return None;
        }

        let mut best: Option<f32> = None;
        for keyword in field.keywords.iter().map(|k| normalize_text(k)) {
            if keyword.is_empty() {
                continue;
            }
            let confidence = if words.iter().any(|w| *w == keyword) {
                Some(KEYWORD_TOKEN_CONFIDENCE)
            } else if words.iter().any(|w| w.starts_with(&keyword)) {
                Some(KEYWORD_PREFIX_CONFIDENCE)
            } else if keyword.len() >= KEYWORD_SUBSTRING_MIN_LEN
                && words.iter().any(|w| w.contains(&keyword))
            {
                Some(KEYWORD_SUBSTRING_CONFIDENCE)
            } else {
                None
            };
            best = match (best, confidence) {
                (Some(current), Some(found)) => Some(current.max(found)),
                (current, found) => current.or(found),
            };
        }
        best
    }
}

// =============================================================================
// Content
// =============================================================================

/// Sampled cell content agrees with a distinctive field type.
///
/// Only dates, e-mail addresses and phone numbers are distinctive enough;
/// numbers could be anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentMatcher;

impl ColumnMatcher for ContentMatcher {
    fn name(&self) -> &'static str {
        MatcherKind::Content.as_str()
    }

    fn matches(
        &self,
        _header: &str,
        field: &TargetField,
        profile: Option<&ColumnProfile>,
    ) -> Option<f32> {
        let inferred = profile?.inferred_type?;
        let distinctive = matches!(
            inferred,
            FieldType::Date | FieldType::Email | FieldType::Phone
        );
        (distinctive && inferred == field.field_type).then_some(CONTENT_CONFIDENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount() -> TargetField {
        TargetField::new("amount", "Amount", FieldType::Currency)
            .with_synonyms(vec!["total".to_string(), "revenue".to_string()])
            .with_keywords(vec!["amount".to_string(), "total".to_string()])
    }

    fn date() -> TargetField {
        TargetField::new("date", "Date", FieldType::Date)
            .with_synonyms(vec!["order date".to_string()])
            .with_keywords(vec!["date".to_string(), "day".to_string()])
    }

    #[test]
    fn test_synonym_matcher() {
        let matcher = SynonymMatcher;
        assert_eq!(matcher.matches("Total $", &amount(), None), Some(1.0));
        assert_eq!(matcher.matches("AMOUNT", &amount(), None), Some(1.0));
        assert_eq!(matcher.matches("order_date", &date(), None), Some(1.0));
        assert_eq!(matcher.matches("Grand Total", &amount(), None), None);
    }

    #[test]
    fn test_fuzzy_matcher_catches_typos() {
        let matcher = FuzzySynonymMatcher::default();
        let confidence = matcher.matches("Reveune", &amount(), None).unwrap();
        assert!(confidence > 0.8 && confidence < 0.9);
        assert_eq!(matcher.matches("Region", &amount(), None), None);
        // Too short to compare.
        assert_eq!(matcher.matches("Tot", &amount(), None), None);
    }

    #[test]
    fn test_keyword_matcher_ranks_match_kinds() {
        let matcher = KeywordMatcher;
        assert_eq!(matcher.matches("Ship Date", &date(), None), Some(0.75));
        assert_eq!(matcher.matches("Dates Shipped", &date(), None), Some(0.7));
        assert_eq!(matcher.matches("ShipDate", &date(), None), Some(0.65));
        // Short keywords only match whole words or prefixes.
        assert_eq!(matcher.matches("Holiday", &date(), None), None);
        assert_eq!(matcher.matches("Customer", &date(), None), None);
    }

    #[test]
    fn test_content_matcher() {
        let profile = ColumnProfile {
            name: "When".to_string(),
            inferred_type: Some(FieldType::Date),
            ..ColumnProfile::default()
        };
        assert_eq!(
            ContentMatcher.matches("When", &date(), Some(&profile)),
            Some(0.6)
        );
        assert_eq!(ContentMatcher.matches("When", &amount(), Some(&profile)), None);
        assert_eq!(ContentMatcher.matches("When", &date(), None), None);

        let numeric = ColumnProfile {
            inferred_type: Some(FieldType::Currency),
            ..ColumnProfile::default()
        };
        assert_eq!(ContentMatcher.matches("X", &amount(), Some(&numeric)), None);
    }

    #[test]
    fn test_matcher_kind_names() {
        let names: Vec<&str> = MatcherKind::ALL.iter().map(MatcherKind::as_str).collect();
        assert_eq!(names, vec!["synonym", "fuzzy_synonym", "keyword", "content"]);
    }
}
