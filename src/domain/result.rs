//! Result type alias for the anonymizer
//!
//! This module provides a convenient Result type alias that uses
//! [`AnonymizerError`] as the error type.

use super::errors::AnonymizerError;

/// Result type alias for anonymizer operations
///
/// # Examples
///
/// ```
/// use registry_anonymizer::domain::result::Result;
/// use registry_anonymizer::domain::errors::AnonymizerError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(AnonymizerError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, AnonymizerError>;
