//! Configuration schema types
//!
//! Every section is defaulted, so an empty file (or no file at all) yields
//! the configuration the registry corpus was originally processed with.

use crate::domain::{Partition, PartitionRange};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main anonymizer configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Partition range processed when no single partition is requested
    #[serde(default)]
    pub batch: BatchConfig,

    /// Salt table persistence
    #[serde(default)]
    pub salts: SaltsConfig,

    /// Element-name rules driving the rewriter
    #[serde(default)]
    pub rules: RulesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AnonymizerConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.batch.validate()?;
        self.salts.validate()?;
        self.rules.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (rewrite but discard output and keep the salt table)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Historical range of the corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// First partition, as `<year>/<month>`
    #[serde(default = "default_first_partition")]
    pub first_partition: String,

    /// Last partition (inclusive), as `<year>/<month>`
    #[serde(default = "default_last_partition")]
    pub last_partition: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            first_partition: default_first_partition(),
            last_partition: default_last_partition(),
        }
    }
}

impl BatchConfig {
    /// Parses the configured bounds into a partition range
    pub fn range(&self) -> Result<PartitionRange, String> {
        let first: Partition = self
            .first_partition
            .parse()
            .map_err(|e| format!("batch.first_partition: {e}"))?;
        let last: Partition = self
            .last_partition
            .parse()
            .map_err(|e| format!("batch.last_partition: {e}"))?;
        PartitionRange::new(first, last)
    }

    fn validate(&self) -> Result<(), String> {
        self.range().map(|_| ())
    }
}

/// Salt table persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaltsConfig {
    /// Path of the salt table file
    #[serde(default = "default_salts_path")]
    pub path: String,
}

impl Default for SaltsConfig {
    fn default() -> Self {
        Self {
            path: default_salts_path(),
        }
    }
}

impl SaltsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("salts.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Element-name rules
///
/// All names are XML local names; namespace prefixes are ignored when
/// matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Elements carrying the identifier type (`EGN`, `LNCH`, ...)
    #[serde(default = "default_identifier_type_elements")]
    pub identifier_type_elements: Vec<String>,

    /// Elements carrying the raw identifier value
    #[serde(default = "default_identifier_value_elements")]
    pub identifier_value_elements: Vec<String>,

    /// Local name of the element emitted in place of an identifier value
    #[serde(default = "default_identifier_output_element")]
    pub identifier_output_element: String,

    /// Keep the identifier-type element in the output; by default the pair
    /// collapses into the single output element
    #[serde(default)]
    pub keep_identifier_type: bool,

    /// Elements whose whole subtree is removed as passport data
    #[serde(default = "default_passport_elements")]
    pub passport_elements: Vec<String>,

    /// Address elements, emptied when nested in an address-bearing parent
    #[serde(default = "default_address_elements")]
    pub address_elements: Vec<String>,

    /// Elements whose nested addresses are personal
    #[serde(default = "default_address_parent_elements")]
    pub address_parent_elements: Vec<String>,

    /// Free-text elements removed entirely
    #[serde(default = "default_ignored_elements")]
    pub ignored_elements: Vec<String>,

    /// Elements that delimit one person's identifier record
    #[serde(default = "default_person_elements")]
    pub person_elements: Vec<String>,

    /// Attributes removed from every element
    #[serde(default = "default_stripped_attributes")]
    pub stripped_attributes: Vec<String>,

    /// Identifier types whose values are replaced by salted digests
    #[serde(default = "default_hashed_identifier_types")]
    pub hashed_identifier_types: Vec<String>,

    /// Replacement free-text pattern library (TOML); built-in patterns when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_library: Option<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            identifier_type_elements: default_identifier_type_elements(),
            identifier_value_elements: default_identifier_value_elements(),
            identifier_output_element: default_identifier_output_element(),
            keep_identifier_type: false,
            passport_elements: default_passport_elements(),
            address_elements: default_address_elements(),
            address_parent_elements: default_address_parent_elements(),
            ignored_elements: default_ignored_elements(),
            person_elements: default_person_elements(),
            stripped_attributes: default_stripped_attributes(),
            hashed_identifier_types: default_hashed_identifier_types(),
            pattern_library: None,
        }
    }
}

impl RulesConfig {
    /// Element lists by config key, in a fixed order
    pub fn element_lists(&self) -> [(&'static str, &[String]); 8] {
        [
            ("identifier_type_elements", self.identifier_type_elements.as_slice()),
            ("identifier_value_elements", self.identifier_value_elements.as_slice()),
            ("passport_elements", self.passport_elements.as_slice()),
            ("address_elements", self.address_elements.as_slice()),
            ("address_parent_elements", self.address_parent_elements.as_slice()),
            ("ignored_elements", self.ignored_elements.as_slice()),
            ("person_elements", self.person_elements.as_slice()),
            ("stripped_attributes", self.stripped_attributes.as_slice()),
        ]
    }

    fn validate(&self) -> Result<(), String> {
        if self.identifier_type_elements.is_empty() {
            return Err("rules.identifier_type_elements cannot be empty".to_string());
        }
        if self.identifier_value_elements.is_empty() {
            return Err("rules.identifier_value_elements cannot be empty".to_string());
        }
        if !is_local_name(&self.identifier_output_element) {
            return Err(format!(
                "rules.identifier_output_element '{}' is not a valid XML local name",
                self.identifier_output_element
            ));
        }

        for (key, names) in self.element_lists() {
            if let Some(bad) = names.iter().find(|n| !is_local_name(n)) {
                return Err(format!("rules.{key} contains invalid name '{bad}'"));
            }
        }

        // An element can play only one role; attributes are a separate namespace
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for (key, names) in self.element_lists() {
            if key == "stripped_attributes" {
                continue;
            }
            for name in names {
                if let Some(previous) = owners.insert(name.as_str(), key) {
                    if previous != key {
                        return Err(format!(
                            "Element '{name}' is listed in both rules.{previous} and rules.{key}"
                        ));
                    }
                }
            }
        }

        if let Some(path) = &self.pattern_library {
            if path.trim().is_empty() {
                return Err("rules.pattern_library cannot be empty when set".to_string());
            }
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

fn is_local_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_first_partition() -> String {
    "2008/1".to_string()
}

fn default_last_partition() -> String {
    "2016/12".to_string()
}

fn default_salts_path() -> String {
    "salts".to_string()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_identifier_type_elements() -> Vec<String> {
    names(&["IndentType", "IdentifierType"])
}

fn default_identifier_value_elements() -> Vec<String> {
    names(&["Indent", "IdentifierValue"])
}

fn default_identifier_output_element() -> String {
    "Indent".to_string()
}

fn default_passport_elements() -> Vec<String> {
    names(&["Passport"])
}

fn default_address_elements() -> Vec<String> {
    names(&["Address"])
}

fn default_address_parent_elements() -> Vec<String> {
    names(&[
        "BranchManager",
        "ActualOwner",
        "AtPawnCreditor",
        "DebtorOverSecureClaim",
        "Depositor",
        "Depozitar",
        "Distraint",
        "LimitedLiabilityPartner",
        "ManagerOfTradeEnterprise",
        "PersonConcerned",
        "PledgeCreditor",
        "PledgeExecutionDepozitar",
        "Pledgor",
        "Procurator",
        "CoOperative2",
        "SecuredClaimDebtor",
        "SpecialManager",
        "SupervisionBodyMember",
        "SupervisionBodyMemberFull",
        "SupervisionBodyMemberFullSecIns",
        "SupervisionBodyMemberFullThirdIns",
        "Trustee",
        "TrusteeSecIns",
        "TrusteeThirdIns",
        "UnlimitedLiabilityPartner",
    ])
}

fn default_ignored_elements() -> Vec<String> {
    names(&["Description033"])
}

fn default_person_elements() -> Vec<String> {
    names(&[
        "Person",
        "Subject",
        "NewOwner",
        "OldOwner",
        "BranchSubject",
        "Petitioner",
    ])
}

fn default_stripped_attributes() -> Vec<String> {
    names(&["DocumentURL"])
}

fn default_hashed_identifier_types() -> Vec<String> {
    names(&["EGN", "LNCH", "BirthDate", "Undefined"])
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
