//! Core orchestration for the registry anonymizer.
//!
//! # Modules
//!
//! - [`batch`] - Partition walk, per-document rewrite and run summary
//!
//! # Batch Workflow
//!
//! 1. **Load salts**: Read the salt table (empty when missing)
//! 2. **Walk partitions**: `<root>/<year>/<month>`, chronologically
//! 3. **Rewrite**: Stream each document through the anonymization engine
//! 4. **Mirror**: Write to `<target>/<year>/<month>/<file>`
//! 5. **Save salts**: Always, also after a failure (never in dry-run mode)
//!
//! # Example
//!
//! ```rust,no_run
//! use registry_anonymizer::anonymization::AnonymizationEngine;
//! use registry_anonymizer::config::AnonymizerConfig;
//! use registry_anonymizer::core::batch::{BatchDriver, BatchOptions};
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnonymizerConfig::default();
//! let engine = AnonymizationEngine::new(&config.rules)?;
//!
//! // Create shutdown signal
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let options = BatchOptions {
//!     root: PathBuf::from("/data/brra"),
//!     target: PathBuf::from("/data/brra-anonymized"),
//!     range: config.batch.range()?,
//!     dry_run: false,
//! };
//! let driver = BatchDriver::new(engine, options, shutdown_rx);
//! let summary = driver.execute(Path::new(&config.salts.path))?;
//!
//! println!("Files: {}", summary.files_processed);
//! # Ok(())
//! # }
//! ```

pub mod batch;
