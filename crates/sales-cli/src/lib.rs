//! CLI library components for the sales importer.

pub mod args;
pub mod logging;
pub mod session;
