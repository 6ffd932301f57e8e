pub(crate) mod error;
mod compound;

pub use self::compound::{Provenance, Resolution, ResolveOptions, resolve_compound};
