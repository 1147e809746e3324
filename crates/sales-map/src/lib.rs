//! Source column to target field mapping.
//!
//! Two halves:
//!
//! - [`AutoMapper`]: heuristic pre-population of a [`Mapping`] from header
//!   text and sampled cell content, driven by an ordered list of
//!   [`ColumnMatcher`] strategies
//! - [`MappingEditor`]: operator edits (`map`, `unmap`, `reset`) over the
//!   mapping, keeping one source per target at every step
//!
//! # Example
//!
//! ```ignore
//! use sales_map::{AutoMapper, MappingEditor};
//!
//! let result = AutoMapper::default().suggest(&headers, registry.fields(), &preview_rows);
//! let mut editor = MappingEditor::new(headers, registry.fields().to_vec());
//! editor.apply_suggestions(result.to_mapping());
//! editor.map("Ship Date", "date")?;
//! println!("{}", editor.completion_status());
//! ```
//!
//! [`Mapping`]: sales_model::Mapping

#![deny(unsafe_code)]

mod engine;
mod error;
mod matchers;
mod state;
mod utils;

pub use engine::{
    AutoMapper, AutoMapperConfig, ConfidenceLevel, MappingResult, MappingSuggestion, detect,
};
pub use error::MappingError;
pub use matchers::{
    ColumnMatcher, ContentMatcher, FuzzySynonymMatcher, KeywordMatcher, MatcherKind,
    SynonymMatcher,
};
pub use state::{CompletionStatus, MappingEditor, MappingSummary};
pub use utils::{normalize_text, tokens};
