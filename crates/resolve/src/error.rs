//! Resolver Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Each operation module carries its
//! own finer-grained kinds; these are the ones callers match on.

use derive_more::{Display, Error};

/// A resolver error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which operation failed.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("failed to bootstrap the compound cache")]
    Bootstrap,
    #[display("failed to resolve compound")]
    Resolve,
    #[display("failed to refresh the compound cache")]
    Refresh,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            _ => false,
        }
    }
}
