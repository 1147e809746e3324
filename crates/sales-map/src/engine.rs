//! Auto-mapper implementation.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use sales_ingest::build_column_profiles;
use sales_model::{ColumnProfile, Mapping, Row, SourceColumn, TargetField};
use serde::{Deserialize, Serialize};

use crate::matchers::{ColumnMatcher, FuzzySynonymMatcher, MatcherKind};

/// Confidence level categories for suggestion quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Content or loose keyword evidence only.
    Low,
    /// Keyword or fuzzy name evidence.
    Medium,
    /// Exact or near-exact name match.
    High,
}

impl ConfidenceLevel {
    /// Categorizes a confidence score.
    #[must_use]
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= 0.95 {
            Self::High
        } else if confidence >= 0.7 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Auto-mapper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoMapperConfig {
    /// Enabled strategies, evaluated in this order.
    pub matchers: Vec<MatcherKind>,
    /// Minimum Jaro-Winkler similarity for fuzzy synonym matches.
    pub fuzzy_threshold: f64,
    /// Number of sample rows profiled for content matching.
    pub sample_size: usize,
    /// Suggestions below this confidence are discarded.
    pub min_confidence: f32,
}

impl Default for AutoMapperConfig {
    fn default() -> Self {
        Self {
            matchers: MatcherKind::ALL.to_vec(),
            fuzzy_threshold: FuzzySynonymMatcher::DEFAULT_THRESHOLD,
            sample_size: 50,
            min_confidence: 0.5,
        }
    }
}

impl AutoMapperConfig {
    pub fn with_matchers(mut self, matchers: impl IntoIterator<Item = MatcherKind>) -> Self {
        self.matchers = matchers.into_iter().collect();
        self
    }

    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    pub fn with_sample_size(mut self, rows: usize) -> Self {
        self.sample_size = rows;
        self
    }

    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }
}

/// A proposed source column to target field assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSuggestion {
    pub source_column: String,
    pub target_field: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
    /// Name of the strategy that produced the suggestion.
    pub matcher: String,
}

impl MappingSuggestion {
    pub fn level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }
}

/// Result of an auto-mapping run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingResult {
    /// Suggestions in the order they were claimed.
    pub suggestions: Vec<MappingSuggestion>,
    /// Source columns left unmapped, in header order.
    pub unmapped_columns: Vec<String>,
}

impl MappingResult {
    /// The suggestions as a mapping.
    pub fn to_mapping(&self) -> Mapping {
        let mut mapping = Mapping::new();
        for suggestion in &self.suggestions {
            mapping.assign(
                suggestion.source_column.clone(),
                suggestion.target_field.clone(),
            );
        }
        mapping
    }

    pub fn suggestion_for(&self, source_column: &str) -> Option<&MappingSuggestion> {
        self.suggestions
            .iter()
            .find(|s| s.source_column == source_column)
    }

    /// Returns the count of suggestions at each confidence level.
    #[must_use]
    pub fn count_by_level(&self) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for suggestion in &self.suggestions {
            *counts.entry(suggestion.level()).or_insert(0) += 1;
        }
        counts
    }

    /// Returns the mean confidence score among all suggestions, if any.
    #[must_use]
    pub fn mean_confidence(&self) -> Option<f32> {
        if self.suggestions.is_empty() {
            return None;
        }
        let sum: f32 = self.suggestions.iter().map(|s| s.confidence).sum();
        Some(sum / self.suggestions.len() as f32)
    }
}

/// Heuristic engine proposing a one-to-one column mapping.
///
/// Strategies run in priority order. Each strategy visits the still
/// unclaimed columns in header order and claims, per column, its most
/// confident still unclaimed field; ties go to the field declared first.
/// Once claimed, a field is skipped by every later column and strategy.
///
/// # Example
///
/// ```ignore
/// use sales_map::AutoMapper;
///
/// let result = AutoMapper::default().suggest(&headers, registry.fields(), &preview_rows);
/// let mapping = result.to_mapping();
/// ```
pub struct AutoMapper {
    matchers: Vec<Box<dyn ColumnMatcher>>,
    sample_size: usize,
    min_confidence: f32,
}

impl Default for AutoMapper {
    fn default() -> Self {
        Self::new(&AutoMapperConfig::default())
    }
}

impl AutoMapper {
    pub fn new(config: &AutoMapperConfig) -> Self {
        let mut seen = BTreeSet::new();
        let matchers = config
            .matchers
            .iter()
            .copied()
            .filter(|kind| seen.insert(*kind))
            .map(|kind| kind.build(config.fuzzy_threshold))
            .collect();
        Self {
            matchers,
            sample_size: config.sample_size,
            min_confidence: config.min_confidence,
        }
    }

    /// Engine with custom strategies, evaluated in the given order.
    pub fn with_matchers(matchers: Vec<Box<dyn ColumnMatcher>>) -> Self {
        let defaults = AutoMapperConfig::default();
        Self {
            matchers,
            sample_size: defaults.sample_size,
            min_confidence: defaults.min_confidence,
        }
    }

    /// Names of the active strategies in priority order.
    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Suggests mappings, profiling up to `sample_size` of `sample_rows`.
    pub fn suggest(
        &self,
        columns: &[SourceColumn],
        fields: &[TargetField],
        sample_rows: &[Row],
    ) -> MappingResult {
        let sample = &sample_rows[..sample_rows.len().min(self.sample_size)];
        let profiles = build_column_profiles(columns, sample, self.sample_size);
        self.suggest_with_profiles(columns, fields, &profiles)
    }

    /// Suggests mappings from precomputed column profiles.
    pub fn suggest_with_profiles(
        &self,
        columns: &[SourceColumn],
        fields: &[TargetField],
        profiles: &[ColumnProfile],
    ) -> MappingResult {
        let profile_by_name: BTreeMap<&str, &ColumnProfile> =
            profiles.iter().map(|p| (p.name.as_str(), p)).collect();

        let mut claimed_columns: BTreeSet<&str> = BTreeSet::new();
        let mut claimed_fields: BTreeSet<&str> = BTreeSet::new();
        let mut suggestions = Vec::new();

        for matcher in &self.matchers {
            for column in columns {
                let header = column.as_str();
                if claimed_columns.contains(header) {
                    continue;
                }
                let profile = profile_by_name.get(header).copied();

                let mut best: Option<(&TargetField, f32)> = None;
                for field in fields {
                    if claimed_fields.contains(field.id.as_str()) {
                        continue;
                    }
                    let Some(confidence) = matcher.matches(header, field, profile) else {
                        continue;
                    };
                    if confidence < self.min_confidence {
                        continue;
                    }
                    // Strictly greater: earlier declarations win ties.
                    let better = best.is_none_or(|(_, current)| {
                        confidence.partial_cmp(&current) == Some(Ordering::Greater)
                    });
                    if better {
                        best = Some((field, confidence));
                    }
                }

                if let Some((field, confidence)) = best {
                    claimed_columns.insert(header);
                    claimed_fields.insert(field.id.as_str());
                    tracing::debug!(
                        column = header,
                        field = %field.id,
                        confidence,
                        matcher = matcher.name(),
                        "auto-mapped column"
                    );
                    suggestions.push(MappingSuggestion {
                        source_column: header.to_string(),
                        target_field: field.id.clone(),
                        confidence,
                        matcher: matcher.name().to_string(),
                    });
                }
            }
        }

        let unmapped_columns: Vec<String> = columns
            .iter()
            .map(SourceColumn::as_str)
            .filter(|c| !claimed_columns.contains(c))
            .map(str::to_string)
            .collect();

        tracing::info!(
            mapped = suggestions.len(),
            unmapped = unmapped_columns.len(),
            "auto-detected mapping"
        );

        MappingResult {
            suggestions,
            unmapped_columns,
        }
    }
}

/// Detects a mapping with the default strategies.
///
/// Best-effort and infallible: an empty mapping is a valid result.
pub fn detect(columns: &[SourceColumn], fields: &[TargetField], sample_rows: &[Row]) -> Mapping {
    AutoMapper::default()
        .suggest(columns, fields, sample_rows)
        .to_mapping()
}
