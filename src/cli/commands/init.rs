//! Init command implementation
//!
//! This module implements the `init` command for generating a configuration
//! file populated with the built-in defaults.

use crate::config::AnonymizerConfig;
use clap::Args;
use std::fs;
use std::path::Path;

const CONFIG_HEADER: &str = "\
# Registry Anonymizer Configuration File
#
# Every value below is the built-in default; delete what you do not change.
# Values may reference environment variables as ${VAR}, and every key can be
# overridden with ANONYMIZER_<SECTION>_<KEY>.

";

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "anonymizer.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing registry anonymizer configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = generate_default_config()?;

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: registry-anonymizer validate-config");
                println!("  3. Run: registry-anonymizer anonymize <ROOT_DIR> <TARGET_DIR>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }
}

/// Default configuration rendered as commented TOML
pub fn generate_default_config() -> anyhow::Result<String> {
    let body = toml::to_string_pretty(&AnonymizerConfig::default())?;
    Ok(format!("{CONFIG_HEADER}{body}"))
}
