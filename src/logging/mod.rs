//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output on stderr
//! - JSON-formatted local log files with rotation
//! - Configurable log levels, overridable through `RUST_LOG`
//!
//! Identifier values and salts are never logged; only counts and paths.
//!
//! # Example
//!
//! ```no_run
//! use registry_anonymizer::logging::init_logging;
//! use registry_anonymizer::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(partition = "2010/3", "Processing partition");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a partition
///
/// # Example
///
/// ```no_run
/// use registry_anonymizer::log_partition_start;
/// use registry_anonymizer::domain::Partition;
///
/// let partition = Partition::new(2010, 3).unwrap();
/// log_partition_start!(partition, 42);
/// ```
#[macro_export]
macro_rules! log_partition_start {
    ($partition:expr, $files:expr) => {
        tracing::info!(
            partition = %$partition,
            files = $files,
            "Processing partition"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use registry_anonymizer::log_error_with_context;
/// use registry_anonymizer::domain::AnonymizerError;
///
/// let error = AnonymizerError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
