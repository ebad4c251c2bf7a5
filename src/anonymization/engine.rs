//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that wires the element
//! rules, the identifier redactor and the free-text scrubber into a
//! [`DocumentRewriter`] for each document.
//!
//! # Examples
//!
//! ```no_run
//! use registry_anonymizer::anonymization::{AnonymizationEngine, SaltStore};
//! use registry_anonymizer::config::RulesConfig;
//!
//! # fn example() -> registry_anonymizer::domain::Result<()> {
//! let engine = AnonymizationEngine::new(&RulesConfig::default())?;
//! let mut salts = SaltStore::load("salts")?;
//!
//! let stats = engine.process_file("in/2010/3/a.xml", "out/2010/3/a.xml", &mut salts)?;
//! println!("{} identifiers hashed", stats.identifiers_hashed);
//!
//! salts.save("salts")?;
//! # Ok(())
//! # }
//! ```

use crate::anonymization::redactor::IdentifierRedactor;
use crate::anonymization::report::DocumentStats;
use crate::anonymization::rewriter::{DocumentRewriter, RewriteRules};
use crate::anonymization::rules::ElementRules;
use crate::anonymization::salt::SaltStore;
use crate::anonymization::scrubber::{FreeTextScrubber, PatternRegistry};
use crate::config::RulesConfig;
use crate::domain::{AnonymizerError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// Main anonymization engine
///
/// Immutable once built; the only mutable state of a run is the
/// [`SaltStore`], passed in per call.
pub struct AnonymizationEngine {
    elements: ElementRules,
    redactor: IdentifierRedactor,
    scrubber: FreeTextScrubber,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine
    ///
    /// # Errors
    ///
    /// Returns an error if the configured pattern library cannot be loaded
    pub fn new(config: &RulesConfig) -> Result<Self> {
        let patterns = match &config.pattern_library {
            Some(path) => PatternRegistry::from_file(path)?,
            None => PatternRegistry::default_patterns()?,
        };

        tracing::debug!(
            patterns = patterns.len(),
            hashed_types = config.hashed_identifier_types.len(),
            "Anonymization engine initialized"
        );

        Ok(Self {
            elements: ElementRules::from_config(config),
            redactor: IdentifierRedactor::with_hashed_types(
                config.hashed_identifier_types.iter().cloned(),
            ),
            scrubber: FreeTextScrubber::new(patterns),
        })
    }

    /// Rewrites one document from `input` to `output`
    ///
    /// `source` names the document in errors and logs.
    pub fn process_document<R: BufRead, W: Write>(
        &self,
        input: R,
        output: W,
        salts: &mut SaltStore,
        source: &Path,
    ) -> Result<DocumentStats> {
        let rules = RewriteRules {
            elements: &self.elements,
            redactor: &self.redactor,
            scrubber: &self.scrubber,
        };
        DocumentRewriter::new(rules, salts, output, source).rewrite(input)
    }

    /// Rewrites the file at `src` into `dst`, creating or truncating `dst`
    ///
    /// The parent directory of `dst` must exist.
    pub fn process_file(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        salts: &mut SaltStore,
    ) -> Result<DocumentStats> {
        let src = src.as_ref();
        let dst = dst.as_ref();
        let start = Instant::now();

        let input = File::open(src).map_err(|e| AnonymizerError::io_at(src, e))?;
        let output = File::create(dst).map_err(|e| AnonymizerError::io_at(dst, e))?;

        let stats = self.process_document(
            BufReader::new(input),
            BufWriter::new(output),
            salts,
            src,
        )?;

        tracing::debug!(
            file = %src.display(),
            identifiers = stats.identifiers_emitted,
            hashed = stats.identifiers_hashed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Document anonymized"
        );
        Ok(stats)
    }

    /// Rewrites the file at `src` and discards the output
    pub fn analyze_file(&self, src: impl AsRef<Path>, salts: &mut SaltStore) -> Result<DocumentStats> {
        let src = src.as_ref();
        let input = File::open(src).map_err(|e| AnonymizerError::io_at(src, e))?;
        self.process_document(BufReader::new(input), io::sink(), salts, src)
    }

    /// Element rules in use
    pub fn element_rules(&self) -> &ElementRules {
        &self.elements
    }

    /// Free-text scrubber in use
    pub fn scrubber(&self) -> &FreeTextScrubber {
        &self.scrubber
    }
}
