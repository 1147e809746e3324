//! Import session for sales files.
//!
//! [`Dataset`] is the single aggregate an operator works with: it holds the
//! parsed preview, drives the mapping editor, keeps the validation report in
//! step with every edit and produces the snapshot the commit engine runs on.

mod dataset;
mod error;

pub use dataset::{Dataset, RowSelection};
pub use error::{CoreError, Result};
