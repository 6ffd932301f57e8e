//! Error types for the [`resolve`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};

/// A resolve error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for resolve operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a resolve failure.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The parser collaborator could not render the SMILES as an InChI key.
    Parse,
    /// The builder collaborator could not construct a new compound.
    Build,
    /// A store query, stage, or commit via the
    /// [session](gibbs_cache::Session) failed.
    Store,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            _ => false,
        }
    }
}
