//! Batch run summary
//!
//! This module defines the structure reported at the end of a batch run.

use crate::anonymization::DocumentStats;
use std::time::Duration;

/// Summary of a batch run
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Partitions fully processed
    pub partitions_processed: usize,

    /// Documents rewritten
    pub files_processed: usize,

    /// Rewrite statistics summed over all documents
    pub stats: DocumentStats,

    /// Salts generated during this run
    pub salts_created: usize,

    /// Salt table size at the end of the run
    pub salt_entries: usize,

    /// Duration of the run
    pub duration: Duration,

    /// Whether the run stopped early on a shutdown signal
    pub interrupted: bool,

    /// Whether output and salts were discarded
    pub dry_run: bool,
}

impl BatchSummary {
    /// Create a new empty batch summary
    pub fn new() -> Self {
        Self {
            partitions_processed: 0,
            files_processed: 0,
            stats: DocumentStats::default(),
            salts_created: 0,
            salt_entries: 0,
            duration: Duration::from_secs(0),
            interrupted: false,
            dry_run: false,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record one rewritten document
    pub fn add_document(&mut self, stats: DocumentStats) {
        self.files_processed += 1;
        self.stats += stats;
    }

    /// Documents per second over the whole run
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.files_processed as f64 / secs
    }
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self::new()
    }
}
