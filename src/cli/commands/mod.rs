//! CLI command implementations
//!
//! Commands return a process exit code: 0 success, 2 configuration error,
//! 4 connection error, 5 fatal error.

pub mod init;
pub mod serve;
pub mod status;
pub mod validate;

/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when a backend cannot be reached
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for anything else
pub const EXIT_FATAL: i32 = 5;
