//! Data model for the sales import pipeline.
//!
//! These types are shared by every stage of the pipeline: the parser
//! produces [`Row`]s and [`SourceColumn`]s, the schema registry supplies
//! [`TargetField`]s, the mapping editor owns the [`Mapping`], the validator
//! produces [`ValidationError`]s and the commit engine emits [`TypedValue`]s.

#![deny(unsafe_code)]

pub mod coerce;
pub mod error;
pub mod field;
pub mod mapping;
pub mod profile;
pub mod row;
pub mod validation;
pub mod value;

pub use coerce::{CoerceError, coerce};
pub use error::{ModelError, Result};
pub use field::{FieldType, TargetField};
pub use mapping::{Mapping, MappingConfig};
pub use profile::ColumnProfile;
pub use row::{Row, SourceColumn};
pub use validation::{ValidationError, ValidationErrorKind};
pub use value::TypedValue;
