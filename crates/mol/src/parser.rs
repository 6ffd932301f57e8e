//! Collaborator traits for the external chemistry toolkit.
//!
//! gibbs never parses molecular structure itself. A hosting application
//! injects implementations of these traits (typically thin wrappers around a
//! cheminformatics library) into the resolver.

use crate::compound::Compound;
use crate::error::Result;
use crate::key::InchiKey;

/// Renders a molecule description as a canonical InChI key.
///
/// Input is a SMILES string only. InChI *input* is not accepted: callers
/// holding an InChI string must convert it to SMILES (or extend their parser
/// implementation) before resolving. Implementations should return
/// [`InvalidSmiles`](crate::error::ErrorKind::InvalidSmiles) for anything
/// they cannot parse.
pub trait MoleculeParser: Send + Sync {
    fn inchi_key(&self, smiles: &str) -> Result<InchiKey>;
}

/// Constructs a new [`Compound`] record from a molecule description.
///
/// This is the expensive collaborator: real implementations decompose the
/// molecule and prepare whatever the downstream thermodynamic estimators
/// need. The resolver only calls it on a cache miss, and always with the
/// full original SMILES string, never a truncated key.
pub trait CompoundBuilder: Send + Sync {
    fn build(&self, smiles: &str) -> Result<Compound>;
}
