//! Anonymization of registry filings
//!
//! Streams each XML document once and removes or pseudonymizes everything
//! that identifies a natural person.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Salt store**: per-identifier random salts, persisted between runs
//! - **Redactor**: salted SHA-256 digests for national and foreigner IDs
//! - **Scrubber**: regex deletion of ID mentions in free text
//! - **Rewriter**: event-driven context tracking that suppresses passport
//!   blocks, personal addresses and ignored fields and reinjects identifiers
//!
//! # Usage
//!
//! ```rust,ignore
//! use registry_anonymizer::anonymization::{AnonymizationEngine, SaltStore};
//!
//! let engine = AnonymizationEngine::new(&config.rules)?;
//! let mut salts = SaltStore::load(&config.salts.path)?;
//! let stats = engine.process_file(src, dst, &mut salts)?;
//! salts.save(&config.salts.path)?;
//! ```

pub mod context;
pub mod engine;
pub mod redactor;
pub mod report;
pub mod rewriter;
pub mod rules;
pub mod salt;
pub mod scrubber;

// Re-export main types
pub use engine::AnonymizationEngine;
pub use redactor::{IdentifierRedactor, Redaction};
pub use report::DocumentStats;
pub use rules::{ElementRole, ElementRules};
pub use salt::{Salt, SaltStore};
pub use scrubber::{FreeTextScrubber, PatternRegistry};
