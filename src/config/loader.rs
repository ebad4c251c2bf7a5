//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::AnonymizerConfig;
use crate::domain::errors::AnonymizerError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AnonymizerConfig
/// 4. Applies environment variable overrides (ANONYMIZER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use registry_anonymizer::config::loader::load_config;
///
/// let config = load_config("anonymizer.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnonymizerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnonymizerError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AnonymizerError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration from `path` if it exists, otherwise starts from the
/// built-in defaults
///
/// Environment overrides and validation apply in both cases.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<AnonymizerConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
    finish(AnonymizerConfig::default())
}

/// Parses configuration from TOML text
pub fn parse_config(contents: &str) -> Result<AnonymizerConfig> {
    let contents = substitute_env_vars(contents)?;

    let config: AnonymizerConfig = toml::from_str(&contents)
        .map_err(|e| AnonymizerError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(config)
}

fn finish(mut config: AnonymizerConfig) -> Result<AnonymizerConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        AnonymizerError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AnonymizerError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AnonymizerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using ANONYMIZER_* prefix
///
/// Environment variables follow the pattern: ANONYMIZER_<SECTION>_<KEY>
/// For example: ANONYMIZER_SALTS_PATH, ANONYMIZER_BATCH_FIRST_PARTITION.
/// List-valued rules take comma-separated values.
fn apply_env_overrides(config: &mut AnonymizerConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("ANONYMIZER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("ANONYMIZER_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Batch overrides
    if let Ok(val) = std::env::var("ANONYMIZER_BATCH_FIRST_PARTITION") {
        config.batch.first_partition = val;
    }
    if let Ok(val) = std::env::var("ANONYMIZER_BATCH_LAST_PARTITION") {
        config.batch.last_partition = val;
    }

    // Salt table overrides
    if let Ok(val) = std::env::var("ANONYMIZER_SALTS_PATH") {
        config.salts.path = val;
    }

    // Rules overrides
    if let Ok(val) = std::env::var("ANONYMIZER_RULES_HASHED_IDENTIFIER_TYPES") {
        config.rules.hashed_identifier_types = split_list(&val);
    }
    if let Ok(val) = std::env::var("ANONYMIZER_RULES_IDENTIFIER_OUTPUT_ELEMENT") {
        config.rules.identifier_output_element = val;
    }
    if let Ok(val) = std::env::var("ANONYMIZER_RULES_KEEP_IDENTIFIER_TYPE") {
        config.rules.keep_identifier_type = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ANONYMIZER_RULES_PATTERN_LIBRARY") {
        config.rules.pattern_library = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("ANONYMIZER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ANONYMIZER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ANONYMIZER_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
