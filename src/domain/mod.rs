//! Domain types for the registry anonymizer.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Error types** ([`AnonymizerError`], [`XmlError`])
//! - **Result type alias** ([`Result`])
//! - **Corpus partitions** ([`Partition`], [`PartitionRange`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, AnonymizerError>`]:
//!
//! ```rust
//! use registry_anonymizer::domain::{AnonymizerError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(AnonymizerError::Validation("bad input".to_string()))
//! }
//! ```

pub mod errors;
pub mod partition;
pub mod result;

pub use errors::{AnonymizerError, XmlError};
pub use partition::{Partition, PartitionRange};
pub use result::Result;
