//! Domain error types
//!
//! This module defines the error hierarchy for the anonymizer.
//! All errors are domain-specific and don't expose third-party types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main anonymizer error type
///
/// This is the primary error type used throughout the application.
/// Every variant is fatal for a batch run: there is no retry and no
/// per-file isolation.
#[derive(Debug, Error)]
pub enum AnonymizerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors (missing directory, unreadable file, unwritable target)
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed XML encountered while streaming a document
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// Salt table errors (corrupt file, failed save)
    #[error("Salt store error: {0}")]
    SaltStore(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// XML streaming errors
///
/// Carries the document being processed so a batch abort names the
/// offending file.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The reader rejected the input
    #[error("Malformed XML in {file} at byte {position}: {message}")]
    Malformed {
        file: String,
        position: u64,
        message: String,
    },

    /// The writer failed to serialize an event
    #[error("Failed to write XML to {file}: {message}")]
    WriteFailed { file: String, message: String },

    /// Text content is not valid UTF-8 or contains a bad escape
    #[error("Invalid character data in {file}: {message}")]
    InvalidText { file: String, message: String },
}

impl XmlError {
    /// Creates a malformed-input error for the given document
    pub fn malformed(file: impl AsRef<Path>, position: u64, message: impl ToString) -> Self {
        XmlError::Malformed {
            file: file.as_ref().display().to_string(),
            position,
            message: message.to_string(),
        }
    }

    /// Creates a write error for the given document
    pub fn write_failed(file: impl AsRef<Path>, message: impl ToString) -> Self {
        XmlError::WriteFailed {
            file: file.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an invalid-text error for the given document
    pub fn invalid_text(file: impl AsRef<Path>, message: impl ToString) -> Self {
        XmlError::InvalidText {
            file: file.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }
}

impl AnonymizerError {
    /// Wraps an I/O error with the path it happened on
    pub fn io_at(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        AnonymizerError::Io(format!("{}: {}", path.into().display(), err))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for AnonymizerError {
    fn from(err: std::io::Error) -> Self {
        AnonymizerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AnonymizerError {
    fn from(err: serde_json::Error) -> Self {
        AnonymizerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AnonymizerError {
    fn from(err: toml::de::Error) -> Self {
        AnonymizerError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from quick-xml errors that surface without document context
impl From<quick_xml::Error> for AnonymizerError {
    fn from(err: quick_xml::Error) -> Self {
        AnonymizerError::Xml(XmlError::Malformed {
            file: "<stream>".to_string(),
            position: 0,
            message: err.to_string(),
        })
    }
}
