//! Status command implementation
//!
//! This module implements the `status` command for displaying the salt
//! table location and size.

use crate::anonymization::SaltStore;
use crate::config::load_config_or_default;
use clap::Args;
use std::path::Path;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Override the salt table path
    #[arg(long, value_name = "PATH")]
    pub salts: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking salt table status");

        println!("📊 Salt Table Status");
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let path = self.salts.clone().unwrap_or(config.salts.path);
        println!("  Location: {path}");

        if !Path::new(&path).exists() {
            println!("  Entries: 0 (no salt table yet)");
            println!();
            println!("Run 'registry-anonymizer anonymize' to create it.");
            return Ok(0);
        }

        let store = match SaltStore::load(&path) {
            Ok(store) => store,
            Err(e) => {
                println!("❌ Failed to read salt table");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!("  Entries: {}", store.len());
        let updated = store
            .updated_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "Never".to_string());
        println!("  Last Saved: {updated}");
        println!();

        Ok(0)
    }
}
