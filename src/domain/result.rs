//! Result type alias for the bridge
//!
//! This module provides a convenient Result type alias that uses HieError
//! as the error type.

use super::errors::HieError;

/// Result type alias for bridge operations
///
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use hiebridge::domain::result::Result;
/// use hiebridge::domain::errors::HieError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(HieError::Configuration("missing host".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HieError>;
