//! Free-text scrubbing
//!
//! Deletes inline ID-card and personal-ID mentions from character data that
//! is not already suppressed by its element context.

pub mod patterns;

pub use patterns::{CompiledPattern, PatternDefinition, PatternRegistry};

use std::borrow::Cow;

/// Pattern-based deleter for identifier mentions in free text
#[derive(Debug, Clone)]
pub struct FreeTextScrubber {
    registry: PatternRegistry,
}

impl FreeTextScrubber {
    /// Creates a scrubber over the given patterns
    pub fn new(registry: PatternRegistry) -> Self {
        Self { registry }
    }

    /// Deletes every match of every pattern, in registry order
    ///
    /// Returns `Cow::Borrowed` when nothing matched so callers can pass the
    /// original bytes through untouched.
    pub fn scrub<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let mut current: Cow<'t, str> = Cow::Borrowed(text);
        for pattern in self.registry.all_patterns() {
            let replaced = match pattern.regex.replace_all(&current, "") {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = replaced {
                tracing::trace!(pattern = %pattern.name, "Removed free-text identifier");
                current = Cow::Owned(s);
            }
        }
        current
    }

    /// The underlying pattern registry
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }
}
