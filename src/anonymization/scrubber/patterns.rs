//! Pattern library for free-text scrubbing

use crate::domain::{AnonymizerError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Short identifier used in logs
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Regular expression whose matches are deleted
    pub regex: String,
}

/// Compiled pattern with its name
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Pattern name
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: Vec<PatternDefinition>,
}

/// Ordered set of compiled free-text patterns
///
/// Order matters: patterns are applied one after another, each to the output
/// of the previous one.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// Create a pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnonymizerError::Configuration(format!(
                "Failed to read pattern library {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            AnonymizerError::Configuration(format!("Failed to parse pattern library TOML: {e}"))
        })?;

        let mut patterns = Vec::with_capacity(library.patterns.len());
        for def in library.patterns {
            let regex = Regex::new(&def.regex).map_err(|e| {
                AnonymizerError::Configuration(format!(
                    "Invalid regex in pattern '{}': {}",
                    def.name, e
                ))
            })?;
            patterns.push(CompiledPattern {
                name: def.name,
                regex,
            });
        }

        Ok(Self { patterns })
    }

    /// Create the registry with the built-in ID-card and personal-ID patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../patterns/free_text_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// All patterns, in application order
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the registry holds no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
