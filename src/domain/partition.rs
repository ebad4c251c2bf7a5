//! Year/month partition types
//!
//! The registry corpus is laid out as `<root>/<year>/<month>/<file>`, with
//! the month written without zero padding (`2010/3`, not `2010/03`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A single year/month partition of the corpus
///
/// # Examples
///
/// ```
/// use registry_anonymizer::domain::Partition;
/// use std::str::FromStr;
///
/// let partition = Partition::from_str("2010/3").unwrap();
/// assert_eq!(partition.year(), 2010);
/// assert_eq!(partition.month(), 3);
/// assert_eq!(partition.relative_dir(), std::path::PathBuf::from("2010").join("3"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Partition {
    year: u16,
    month: u8,
}

impl Partition {
    /// Creates a partition, validating the month
    pub fn new(year: u16, month: u8) -> Result<Self, String> {
        if !(1..=12).contains(&month) {
            return Err(format!("Month must be between 1 and 12, got {month}"));
        }
        if year == 0 {
            return Err("Year cannot be 0".to_string());
        }
        Ok(Self { year, month })
    }

    /// Returns the year
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Returns the month (1-12)
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Directory of this partition relative to a corpus root
    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from(self.year.to_string()).join(self.month.to_string())
    }

    /// The partition that follows this one
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.month)
    }
}

impl FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('/')
            .ok_or_else(|| format!("Invalid partition '{s}'. Expected format: <year>/<month>"))?;
        let year = year
            .trim()
            .parse::<u16>()
            .map_err(|e| format!("Invalid year in partition '{s}': {e}"))?;
        let month = month
            .trim()
            .parse::<u8>()
            .map_err(|e| format!("Invalid month in partition '{s}': {e}"))?;
        Self::new(year, month)
    }
}

/// An inclusive range of partitions, iterated in chronological order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRange {
    start: Partition,
    end: Partition,
}

impl PartitionRange {
    /// Creates a range; `start` must not be after `end`
    pub fn new(start: Partition, end: Partition) -> Result<Self, String> {
        if start > end {
            return Err(format!("Partition range start {start} is after end {end}"));
        }
        Ok(Self { start, end })
    }

    /// A range covering a single partition
    pub fn single(partition: Partition) -> Self {
        Self {
            start: partition,
            end: partition,
        }
    }

    /// First partition of the range
    pub fn start(&self) -> Partition {
        self.start
    }

    /// Last partition of the range
    pub fn end(&self) -> Partition {
        self.end
    }

    /// Iterates every partition in the range
    pub fn iter(&self) -> impl Iterator<Item = Partition> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |p| {
            let next = p.next();
            (next <= end).then_some(next)
        })
    }
}
