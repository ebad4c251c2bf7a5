//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use registry_anonymizer::anonymization::AnonymizationEngine;
use registry_anonymizer::config::{load_config, load_config_or_default, AnonymizerConfig};
use registry_anonymizer::domain::{AnonymizerError, Partition};
use std::io::Write;
use std::sync::Mutex;
use tempfile::{tempdir, NamedTempFile};

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("ANONYMIZER_APPLICATION_LOG_LEVEL");
    std::env::remove_var("ANONYMIZER_SALTS_PATH");
    std::env::remove_var("ANONYMIZER_BATCH_LAST_PARTITION");
    std::env::remove_var("ANONYMIZER_RULES_HASHED_IDENTIFIER_TYPES");
    std::env::remove_var("TEST_SALTS_DIR");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[batch]
first_partition = "2010/1"
last_partition = "2010/6"

[salts]
path = "/var/lib/anonymizer/salts"

[rules]
identifier_type_elements = ["IndentType"]
identifier_value_elements = ["Indent"]
passport_elements = ["Passport", "IdentityDocument"]
address_elements = ["Address"]
address_parent_elements = ["Procurator"]
ignored_elements = ["Description033", "Remarks"]
person_elements = ["Person"]
stripped_attributes = ["DocumentURL", "ScanURL"]
hashed_identifier_types = ["EGN"]

[logging]
local_enabled = true
local_path = "/var/log/anonymizer"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    let range = config.batch.range().unwrap();
    assert_eq!(range.start(), Partition::new(2010, 1).unwrap());
    assert_eq!(range.iter().count(), 6);
    assert_eq!(config.salts.path, "/var/lib/anonymizer/salts");
    assert_eq!(config.rules.passport_elements.len(), 2);
    assert_eq!(config.rules.hashed_identifier_types, vec!["EGN"]);
    assert_eq!(config.rules.identifier_output_element, "Indent");
    assert_eq!(config.logging.local_rotation, "hourly");

    let engine = AnonymizationEngine::new(&config.rules).unwrap();
    assert!(engine.element_rules().is_stripped_attribute(b"ScanURL"));
}

#[test]
fn test_missing_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let dir = tempdir().unwrap();
    let config = load_config_or_default(dir.path().join("anonymizer.toml")).unwrap();
    let defaults = AnonymizerConfig::default();

    assert_eq!(config.salts.path, defaults.salts.path);
    assert_eq!(config.batch.first_partition, "2008/1");
    assert_eq!(config.batch.last_partition, "2016/12");
    assert_eq!(config.rules.address_parent_elements.len(), 25);

    assert!(load_config(dir.path().join("anonymizer.toml")).is_err());
}

#[test]
fn test_env_overrides_apply() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("ANONYMIZER_SALTS_PATH", "/tmp/override-salts");
    std::env::set_var("ANONYMIZER_BATCH_LAST_PARTITION", "2009/2");
    std::env::set_var("ANONYMIZER_RULES_HASHED_IDENTIFIER_TYPES", "EGN, LNCH");

    let file = write_config("[salts]\npath = \"salts\"\n");
    let config = load_config(file.path()).unwrap();
    cleanup_env_vars();

    assert_eq!(config.salts.path, "/tmp/override-salts");
    assert_eq!(config.batch.last_partition, "2009/2");
    assert_eq!(config.rules.hashed_identifier_types, vec!["EGN", "LNCH"]);
}

#[test]
fn test_env_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    std::env::set_var("TEST_SALTS_DIR", "/srv/salts");
    let file = write_config("[salts]\npath = \"${TEST_SALTS_DIR}/table\"\n");
    let config = load_config(file.path()).unwrap();
    cleanup_env_vars();

    assert_eq!(config.salts.path, "/srv/salts/table");
}

#[test]
fn test_missing_substitution_variable_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[salts]\npath = \"${TEST_SALTS_DIR}/table\"\n");
    let result = load_config(file.path());
    assert!(matches!(result, Err(AnonymizerError::Configuration(_))));
}

#[test]
fn test_validation_failures() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"verbose\"\n",
        "[batch]\nfirst_partition = \"2012/1\"\nlast_partition = \"2011/12\"\n",
        "[batch]\nfirst_partition = \"2012/13\"\n",
        "[rules]\nperson_elements = [\"Passport\"]\n",
        "[rules]\nidentifier_value_elements = []\n",
        "[rules]\nidentifier_output_element = \"1Indent\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ];

    for contents in cases {
        let file = write_config(contents);
        let result = load_config(file.path());
        assert!(
            matches!(result, Err(AnonymizerError::Configuration(_))),
            "expected validation failure for {contents:?}"
        );
    }
}

#[test]
fn test_invalid_pattern_library_fails_engine_construction() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let library = write_config("[[patterns]]\nname = \"broken\"\nregex = \"([0-9\"\n");
    let config_file = write_config(&format!(
        "[rules]\npattern_library = \"{}\"\n",
        library.path().display()
    ));

    let config = load_config(config_file.path()).unwrap();
    assert!(AnonymizationEngine::new(&config.rules).is_err());
}
