//! Molecule Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A molecule error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for molecule operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The string is not a well-formed InChI key.
    #[display("invalid InChI key: {_0}")]
    InvalidKey(#[error(not(source))] String),
    /// The molecule description could not be parsed as SMILES.
    #[display("unparseable SMILES: {_0}")]
    InvalidSmiles(#[error(not(source))] String),
    /// The compound constructor could not build a record for the molecule.
    #[display("compound construction failed: {_0}")]
    Construction(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
