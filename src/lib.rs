// Registry Anonymizer - BRRA filing pseudonymization tool
// Copyright (c) 2025 Registry Open Data Contributors
// Licensed under the MIT License

//! # Registry Anonymizer
//!
//! Streaming anonymizer for Bulgarian commercial-registry (BRRA) XML filings.
//! Every document is rewritten in a single pass: national identifiers are
//! replaced by salted SHA-256 digests, passport blocks, personal addresses
//! and free-text remarks are dropped, `DocumentURL` attributes are stripped,
//! and ID numbers mentioned in free text are scrubbed. Everything else is
//! re-serialized as it came in.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Batch driver over the `<root>/<year>/<month>/<file>` corpus
//! - [`anonymization`] - Salt table, redactor, scrubber and streaming rewriter
//! - [`domain`] - Errors and partition types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use registry_anonymizer::anonymization::{AnonymizationEngine, SaltStore};
//! use registry_anonymizer::config::RulesConfig;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = AnonymizationEngine::new(&RulesConfig::default())?;
//! let mut salts = SaltStore::load("salts")?;
//!
//! let input = br#"<Subject><IndentType>EGN</IndentType><Indent>8001010000</Indent></Subject>"#;
//! let mut output = Vec::new();
//! engine.process_document(&input[..], &mut output, &mut salts, Path::new("inline.xml"))?;
//!
//! salts.save("salts")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Pseudonym Stability
//!
//! The salt table maps each raw identifier to a random salt. It is loaded
//! before a run and saved after it, so the same identifier gets the same
//! digest across files and across runs sharing the table. Losing the table
//! breaks linkability with earlier output; leaking it allows re-identification.
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`] with [`domain::AnonymizerError`].
//! Malformed XML and I/O failures are fatal for the batch; the salt table is
//! still saved before the error is reported.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
