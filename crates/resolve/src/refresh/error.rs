//! Error types for the [`refresh`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;

/// A refresh error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for refresh operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a refresh failure.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Could not clear or recreate the cache directory.
    #[display("cache directory error: {_0}")]
    Layout(IoError),
    /// Fetching or exporting the data package failed.
    Registry,
    /// Closing, reopening, or migrating the store failed.
    Store,
}

impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Layout(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Registry)
    }
}
