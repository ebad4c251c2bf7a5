//! Batch processing over the partitioned corpus
//!
//! This module provides:
//! - The batch driver walking `<root>/<year>/<month>/<file>`
//! - The run summary

pub mod driver;
pub mod summary;

pub use driver::{BatchDriver, BatchOptions};
pub use summary::BatchSummary;
