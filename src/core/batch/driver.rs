//! Batch driver - walks the partitioned corpus and rewrites every document
//!
//! Input is laid out as `<root>/<year>/<month>/<file>`; output mirrors it
//! under the target directory. Processing is sequential and shares a single
//! [`SaltStore`] across the whole run.

use crate::anonymization::{AnonymizationEngine, SaltStore};
use crate::core::batch::summary::BatchSummary;
use crate::domain::{AnonymizerError, Partition, PartitionRange, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::watch;

/// What a batch run covers
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Corpus root
    pub root: PathBuf,
    /// Output root, created as needed
    pub target: PathBuf,
    /// Partitions to process
    pub range: PartitionRange,
    /// Rewrite but write nothing and keep the salt table unchanged
    pub dry_run: bool,
}

/// Batch driver
pub struct BatchDriver {
    engine: AnonymizationEngine,
    options: BatchOptions,
    shutdown_signal: watch::Receiver<bool>,
}

impl BatchDriver {
    /// Create a new batch driver
    pub fn new(
        engine: AnonymizationEngine,
        options: BatchOptions,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            engine,
            options,
            shutdown_signal,
        }
    }

    /// Loads the salt table, runs the batch and saves the table
    ///
    /// The table is saved even when the run fails or is interrupted, so salts
    /// handed out for documents already written are never lost. A dry run
    /// never saves.
    pub fn execute(&self, salts_path: &Path) -> Result<BatchSummary> {
        let mut salts = SaltStore::load(salts_path)?;
        let result = self.run(&mut salts);

        if self.options.dry_run {
            return result;
        }

        match (result, salts.save(salts_path)) {
            (Ok(summary), Ok(())) => Ok(summary),
            (Ok(_), Err(save_err)) => Err(save_err),
            (Err(run_err), Ok(())) => Err(run_err),
            (Err(run_err), Err(save_err)) => {
                tracing::error!(error = %save_err, "Failed to save salt table after failed run");
                Err(run_err)
            }
        }
    }

    /// Processes every partition of the range with the given salt table
    ///
    /// Stops before the next document once the shutdown signal is raised.
    pub fn run(&self, salts: &mut SaltStore) -> Result<BatchSummary> {
        let start_time = Instant::now();
        let mut summary = BatchSummary::new();
        summary.dry_run = self.options.dry_run;
        let salts_before = salts.created_count();

        if !self.options.root.is_dir() {
            return Err(AnonymizerError::Io(format!(
                "Input root directory not found: {}",
                self.options.root.display()
            )));
        }

        tracing::info!(
            root = %self.options.root.display(),
            target = %self.options.target.display(),
            first = %self.options.range.start(),
            last = %self.options.range.end(),
            dry_run = self.options.dry_run,
            "Starting batch"
        );

        for partition in self.options.range.iter() {
            if self.is_shutdown_requested() {
                summary.interrupted = true;
                break;
            }

            let completed = self.process_partition(partition, salts, &mut summary)?;
            if !completed {
                summary.interrupted = true;
                break;
            }
        }

        if summary.interrupted {
            tracing::warn!(
                files = summary.files_processed,
                "Shutdown requested, stopping batch"
            );
        }

        summary.salts_created = salts.created_count() - salts_before;
        summary.salt_entries = salts.len();
        let summary = summary.with_duration(start_time.elapsed());

        tracing::info!(
            partitions = summary.partitions_processed,
            files = summary.files_processed,
            identifiers_hashed = summary.stats.identifiers_hashed,
            salts_created = summary.salts_created,
            duration_secs = summary.duration.as_secs_f64(),
            "Batch finished"
        );
        Ok(summary)
    }

    /// Returns `false` when the partition was cut short by a shutdown signal
    fn process_partition(
        &self,
        partition: Partition,
        salts: &mut SaltStore,
        summary: &mut BatchSummary,
    ) -> Result<bool> {
        let relative = partition.relative_dir();
        let source_dir = self.options.root.join(&relative);
        let target_dir = self.options.target.join(&relative);

        if !source_dir.is_dir() {
            return Err(AnonymizerError::Io(format!(
                "Partition {} directory not found: {}",
                partition,
                source_dir.display()
            )));
        }

        let files = list_documents(&source_dir)?;
        crate::log_partition_start!(partition, files.len());

        if !self.options.dry_run {
            fs::create_dir_all(&target_dir).map_err(|e| AnonymizerError::io_at(&target_dir, e))?;
        }

        for file in files {
            if self.is_shutdown_requested() {
                return Ok(false);
            }

            let stats = if self.options.dry_run {
                self.engine.analyze_file(&file, salts)?
            } else {
                let name = file.file_name().ok_or_else(|| {
                    AnonymizerError::Other(format!("Not a file path: {}", file.display()))
                })?;
                self.engine.process_file(&file, target_dir.join(name), salts)?
            };
            summary.add_document(stats);
        }

        summary.partitions_processed += 1;
        Ok(true)
    }

    fn is_shutdown_requested(&self) -> bool {
        *self.shutdown_signal.borrow()
    }
}

/// Regular files directly inside `dir`, sorted by name
fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| AnonymizerError::io_at(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AnonymizerError::io_at(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else {
            tracing::debug!(path = %path.display(), "Skipping non-file entry");
        }
    }
    files.sort();
    Ok(files)
}
