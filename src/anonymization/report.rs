//! Per-document rewrite statistics
//!
//! Counts only. Identifier values and digests never end up in a report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// What the rewriter did to one document (or, summed, to a run)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// XML events read from the input
    pub events_read: u64,

    /// Replacement identifier elements written
    pub identifiers_emitted: u64,

    /// Identifiers whose value was replaced by a digest
    pub identifiers_hashed: u64,

    /// Attributes removed from start tags
    pub attributes_stripped: u64,

    /// Character-data events changed by the free-text scrubber
    pub text_scrubbed: u64,

    /// Events dropped by element context
    pub events_suppressed: u64,
}

impl DocumentStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the rewriter changed anything at all
    pub fn has_changes(&self) -> bool {
        self.identifiers_hashed > 0
            || self.attributes_stripped > 0
            || self.text_scrubbed > 0
            || self.events_suppressed > 0
    }
}

impl AddAssign for DocumentStats {
    fn add_assign(&mut self, other: Self) {
        self.events_read += other.events_read;
        self.identifiers_emitted += other.identifiers_emitted;
        self.identifiers_hashed += other.identifiers_hashed;
        self.attributes_stripped += other.attributes_stripped;
        self.text_scrubbed += other.text_scrubbed;
        self.events_suppressed += other.events_suppressed;
    }
}

impl fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Events read:          {}", self.events_read)?;
        writeln!(f, "Identifiers emitted:  {}", self.identifiers_emitted)?;
        writeln!(f, "Identifiers hashed:   {}", self.identifiers_hashed)?;
        writeln!(f, "Attributes stripped:  {}", self.attributes_stripped)?;
        writeln!(f, "Text events scrubbed: {}", self.text_scrubbed)?;
        write!(f, "Events suppressed:    {}", self.events_suppressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let stats = DocumentStats::new();
        assert_eq!(stats.events_read, 0);
        assert!(!stats.has_changes());
    }

    #[test]
    fn test_add_assign() {
        let mut total = DocumentStats::new();
        let doc = DocumentStats {
            events_read: 10,
            identifiers_emitted: 2,
            identifiers_hashed: 1,
            attributes_stripped: 1,
            text_scrubbed: 0,
            events_suppressed: 3,
        };
        total += doc;
        total += doc;
        assert_eq!(total.events_read, 20);
        assert_eq!(total.identifiers_hashed, 2);
        assert_eq!(total.events_suppressed, 6);
        assert!(total.has_changes());
    }

    #[test]
    fn test_display_and_json() {
        let stats = DocumentStats {
            identifiers_hashed: 4,
            ..DocumentStats::default()
        };
        assert!(stats.to_string().contains("Identifiers hashed:   4"));

        let json = serde_json::to_string(&stats).unwrap();
        let parsed: DocumentStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }
}
