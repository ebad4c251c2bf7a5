//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the anonymizer configuration file.

use crate::anonymization::AnonymizationEngine;
use crate::config::load_config_or_default;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        if !Path::new(config_path).exists() {
            println!("⚠️  Configuration file not found, checking built-in defaults");
        }

        // Loading also validates
        let config = match load_config_or_default(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Compiling the pattern library catches bad regexes
        let engine = match AnonymizationEngine::new(&config.rules) {
            Ok(engine) => {
                println!("✅ Free-text patterns compiled");
                engine
            }
            Err(e) => {
                println!("❌ Failed to compile free-text patterns");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let rules = &config.rules;
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!(
            "  Partition Range: {} .. {}",
            config.batch.first_partition, config.batch.last_partition
        );
        println!("  Salt Table: {}", config.salts.path);
        println!(
            "  Hashed Identifier Types: {}",
            rules.hashed_identifier_types.join(", ")
        );
        println!(
            "  Identifier Output Element: {}",
            rules.identifier_output_element
        );
        println!("  Keep Identifier Type: {}", rules.keep_identifier_type);
        println!("  Person Elements: {}", rules.person_elements.len());
        println!("  Passport Elements: {}", rules.passport_elements.len());
        println!(
            "  Address Parent Elements: {}",
            rules.address_parent_elements.len()
        );
        println!("  Ignored Elements: {}", rules.ignored_elements.len());
        println!(
            "  Stripped Attributes: {}",
            rules.stripped_attributes.join(", ")
        );
        println!(
            "  Free-text Patterns: {} ({})",
            engine.scrubber().registry().len(),
            rules.pattern_library.as_deref().unwrap_or("built-in")
        );
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();

        Ok(0)
    }
}
