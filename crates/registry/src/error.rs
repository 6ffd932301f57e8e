//! Registry Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A registry error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The package name is not in `namespace/name` form.
    #[display("invalid package reference: {_0}")]
    InvalidSpec(#[error(not(source))] String),
    /// The source has no package by that name.
    #[display("package not found: {_0}")]
    PackageNotFound(#[error(not(source))] String),
    /// The package exists but no revision matches the selector.
    #[display("no revision of {_0} matches the requested selector")]
    RevisionNotFound(#[error(not(source))] String),
    /// A manifest could not be parsed or lists an illegal payload path.
    #[display("invalid package manifest")]
    InvalidManifest,
    /// Payload path escapes the package root or is otherwise malformed.
    #[display("invalid payload path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// Underlying I/O error in the install area or a directory source.
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Remote source failure (S3 and friends).
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
}

impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Network(_))
    }
}
