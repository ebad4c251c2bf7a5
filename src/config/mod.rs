//! Configuration management for the registry anonymizer.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ANONYMIZER_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting, so the file itself is optional
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run mode
//! - [`BatchConfig`] - Historical partition range
//! - [`SaltsConfig`] - Salt table location
//! - [`RulesConfig`] - Element-name rules, hashed identifier types, pattern library
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [batch]
//! first_partition = "2008/1"
//! last_partition = "2016/12"
//!
//! [salts]
//! path = "${ANONYMIZER_DATA_DIR}/salts"
//!
//! [rules]
//! ignored_elements = ["Description033"]
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{
    AnonymizerConfig, ApplicationConfig, BatchConfig, LoggingConfig, RulesConfig, SaltsConfig,
};
