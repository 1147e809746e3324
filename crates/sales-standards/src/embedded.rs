//! Embedded schema data.
//!
//! The default schema is compiled into the binary with `include_str!()` so
//! the pipeline works without any configuration files.

/// Default sales target schema.
pub const SALES_FIELDS: &str = include_str!("../data/sales_fields.csv");
