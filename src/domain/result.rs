//! Result type alias for MDB

use super::errors::MdbError;

/// Result type alias for MDB operations
///
/// # Examples
///
/// ```
/// use mdb::domain::result::Result;
/// use mdb::domain::errors::MdbError;
///
/// fn parse_limit(raw: &str) -> Result<u64> {
///     raw.parse()
///         .map_err(|_| MdbError::Validation(format!("invalid limit: {raw}")))
/// }
///
/// assert!(parse_limit("10").is_ok());
/// assert!(parse_limit("ten").is_err());
/// ```
pub type Result<T> = std::result::Result<T, MdbError>;
