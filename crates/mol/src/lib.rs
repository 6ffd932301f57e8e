//! Molecule-domain types for the gibbs compound cache.
//!
//! This crate defines the entities that the rest of the workspace operates
//! on, plus the seams to the chemistry toolkits that gibbs deliberately does
//! not implement itself:
//! - [`InchiKey`] / [`PartialInchiKey`]: the layered structural identifier
//!   and its truncated form used for cache matching.
//! - [`Compound`]: a cache record for a single chemical compound.
//! - [`MoleculeParser`] / [`CompoundBuilder`]: collaborator traits implemented
//!   by an external molecule-parsing toolkit and compound constructor.
//!
//! Actual structure parsing, decomposition, and thermodynamic property
//! estimation all live behind those traits.

mod compound;
pub mod error;
mod key;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod parser;

pub use crate::compound::{Compound, CompoundId};
pub use crate::key::{InchiKey, PartialInchiKey};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockChem;
pub use crate::parser::{CompoundBuilder, MoleculeParser};
