//! Identifier redaction policy
//!
//! Decides, per identifier type, whether a raw identifier value is published
//! as-is or replaced by a salted SHA-256 digest.

use crate::anonymization::salt::SaltStore;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Identifier types hashed by default
///
/// `Undefined` is included because EGN values regularly turn up under it.
pub const DEFAULT_HASHED_TYPES: [&str; 4] = ["EGN", "LNCH", "BirthDate", "Undefined"];

/// Outcome of redacting one identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redaction {
    /// Replaced by a salted digest
    Hashed(String),
    /// Published unchanged
    Unchanged(String),
}

impl Redaction {
    /// The text to publish
    pub fn value(&self) -> &str {
        match self {
            Redaction::Hashed(v) | Redaction::Unchanged(v) => v,
        }
    }

    /// Whether the value was hashed
    pub fn is_hashed(&self) -> bool {
        matches!(self, Redaction::Hashed(_))
    }

    /// Consumes self and returns the text to publish
    pub fn into_value(self) -> String {
        match self {
            Redaction::Hashed(v) | Redaction::Unchanged(v) => v,
        }
    }
}

/// Type-driven identifier redactor
#[derive(Debug, Clone)]
pub struct IdentifierRedactor {
    hashed_types: HashSet<String>,
}

impl IdentifierRedactor {
    /// Creates a redactor that hashes the default identifier types
    pub fn new() -> Self {
        Self::with_hashed_types(DEFAULT_HASHED_TYPES.iter().copied())
    }

    /// Creates a redactor that hashes exactly the given identifier types
    pub fn with_hashed_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hashed_types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether identifiers of `identifier_type` are hashed
    pub fn hashes(&self, identifier_type: &str) -> bool {
        self.hashed_types.contains(identifier_type)
    }

    /// Redacts `value` according to its `identifier_type`
    ///
    /// Hashed types with a non-empty value are replaced by
    /// `SHA-256(salt ∥ value)` in uppercase hex, the salt looked up (or
    /// created) in `salts` under the raw value. Everything else, including
    /// an empty or unknown type, passes through unchanged.
    pub fn redact(&self, salts: &mut SaltStore, identifier_type: &str, value: &str) -> Redaction {
        if value.is_empty() || !self.hashes(identifier_type) {
            return Redaction::Unchanged(value.to_string());
        }

        let salt = salts.get_or_create(value);
        Redaction::Hashed(salted_digest(salt.expose_secret().as_str(), value))
    }
}

impl Default for IdentifierRedactor {
    fn default() -> Self {
        Self::new()
    }
}

/// Uppercase hex SHA-256 of `salt` followed by `value`, both UTF-8
pub fn salted_digest(salt: &str, value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:X}")
}
