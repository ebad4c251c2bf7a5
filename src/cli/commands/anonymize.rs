//! Anonymize command implementation
//!
//! This module implements the `anonymize` command, which rewrites the
//! partitioned corpus under `ROOT_DIR` into `TARGET_DIR`.

use crate::anonymization::AnonymizationEngine;
use crate::config::load_config_or_default;
use crate::core::batch::{BatchDriver, BatchOptions, BatchSummary};
use crate::domain::{Partition, PartitionRange};
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Corpus root laid out as `<year>/<month>/<file>`
    pub root_dir: String,

    /// Output root; the partition layout is mirrored here
    pub target_dir: String,

    /// Process a single partition: year (requires MONTH)
    #[arg(requires = "month")]
    pub year: Option<u16>,

    /// Process a single partition: month, 1-12
    #[arg(value_parser = clap::value_parser!(u8).range(1..=12))]
    pub month: Option<u8>,

    /// Dry run mode - rewrite every document but write nothing and keep the salt table
    #[arg(long)]
    pub dry_run: bool,

    /// Override the salt table path
    #[arg(long, value_name = "PATH")]
    pub salts: Option<String>,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting anonymize command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Some(salts) = &self.salts {
            tracing::info!(path = %salts, "Overriding salt table path from CLI");
            config.salts.path = salts.clone();
        }

        let range = match self.partition_range(config.batch.range()) {
            Ok(range) => range,
            Err(e) => {
                tracing::error!(error = %e, "Invalid partition range");
                eprintln!("Invalid partition range: {e}");
                return Ok(2);
            }
        };

        let engine = match AnonymizationEngine::new(&config.rules) {
            Ok(engine) => engine,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to build anonymization engine");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let dry_run = config.application.dry_run;
        let options = BatchOptions {
            root: PathBuf::from(&self.root_dir),
            target: PathBuf::from(&self.target_dir),
            range,
            dry_run,
        };
        let salts_path = PathBuf::from(&config.salts.path);

        if dry_run {
            println!("🔍 Dry run: documents are rewritten but nothing is written");
            println!();
        }
        println!(
            "🚀 Anonymizing {} .. {} from {}",
            range.start(),
            range.end(),
            self.root_dir
        );
        println!();

        let driver = BatchDriver::new(engine, options, shutdown_signal);
        let result = tokio::task::spawn_blocking(move || driver.execute(&salts_path)).await?;

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                crate::log_error_with_context!(&e, "Anonymization run failed");
                eprintln!("Anonymization failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        print_summary(&summary);

        if summary.interrupted {
            println!("⚠️  Run interrupted. Salt table saved; rerun the remaining partitions.");
            println!();
            return Ok(130);
        }

        println!("✅ Anonymization completed!");
        Ok(0)
    }

    /// The single requested partition, or the configured range
    fn partition_range(
        &self,
        configured: Result<PartitionRange, String>,
    ) -> Result<PartitionRange, String> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => Ok(PartitionRange::single(Partition::new(year, month)?)),
            (None, None) => configured,
            _ => Err("YEAR and MONTH must be given together".to_string()),
        }
    }
}

fn print_summary(summary: &BatchSummary) {
    println!("📊 Anonymization Summary:");
    println!("  Partitions Processed: {}", summary.partitions_processed);
    println!("  Files: {}", summary.files_processed);
    println!("  Identifiers Hashed: {}", summary.stats.identifiers_hashed);
    println!("  Attributes Stripped: {}", summary.stats.attributes_stripped);
    println!("  Text Nodes Scrubbed: {}", summary.stats.text_scrubbed);
    println!("  Events Suppressed: {}", summary.stats.events_suppressed);
    println!("  New Salts: {}", summary.salts_created);
    println!("  Salt Entries: {}", summary.salt_entries);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Throughput: {:.2} files/s", summary.throughput());
    println!();
}
