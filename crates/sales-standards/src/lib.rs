//! Target schema registry.
//!
//! The registry is the ordered, fixed list of [`TargetField`]s source columns
//! can be mapped onto. It is supplied by configuration: either the embedded
//! default sales schema or an external CSV file with the columns
//!
//! ```text
//! Field Id,Label,Required,Type,Description,Synonyms,Keywords,Min,Max
//! ```
//!
//! where `Synonyms` and `Keywords` are `|`-separated lists.
//!
//! # Example
//!
//! ```rust,ignore
//! use sales_standards::SchemaRegistry;
//!
//! let registry = SchemaRegistry::default_sales()?;
//! let date = registry.get("date").unwrap();
//! assert!(date.required);
//! ```

mod embedded;
mod error;
mod loader;
mod registry;

pub use error::{Result, StandardsError};
pub use loader::{load_fields_from_path, load_fields_from_str};
pub use registry::SchemaRegistry;

pub use sales_model::{FieldType, TargetField};
