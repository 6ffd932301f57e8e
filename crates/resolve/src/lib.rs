//! Compound resolution orchestration.
//!
//! Wires the other gibbs crates together into one [`CompoundCache`] context:
//! bootstrap the local store from a data package on first use, resolve
//! SMILES strings to compound records (looking up by partial InChI key and
//! building new records on a miss), and rebuild the store wholesale from a
//! newer package revision.
//!
//! All external collaborators are injected: the package source
//! ([`gibbs_registry::PackageSource`]) and the chemistry toolkit
//! ([`gibbs_mol::MoleculeParser`] / [`gibbs_mol::CompoundBuilder`]).

pub mod bootstrap;
mod context;
pub mod error;
pub mod refresh;
pub mod resolve;

pub use crate::context::{BuilderHandle, CompoundCache, ParserHandle};
pub use crate::resolve::{Provenance, Resolution, ResolveOptions};
