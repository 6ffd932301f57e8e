//! Versioned data-package client.
//!
//! The compound store is materialized from a named, versioned data package
//! (e.g. `equilibrator/cache`). This crate models that distribution layer:
//! - [`PackageSpec`]: an addressable package name plus optional hash/tag/
//!   version selectors.
//! - [`PackageSource`]: where package revisions live. [`DirSource`] serves a
//!   local package store; `S3Source` (feature `s3`) serves the same layout
//!   from a bucket; `MockSource` (feature `mock`) is in-memory for tests.
//! - [`Installer`]: fetches a selected revision into a local install area
//!   and [exports](Installed::export) its payload into a target directory.
//!
//! The transport protocol behind a source is deliberately not this crate's
//! business; a source only has to resolve manifests and read payload files.

pub mod error;
mod install;
mod manifest;
mod package;
pub mod source;

pub use crate::install::{Installed, Installer};
pub use crate::manifest::Manifest;
pub use crate::package::{PackageSpec, Selector};
pub use crate::source::DirSource;
#[cfg(any(test, feature = "mock"))]
pub use crate::source::MockSource;
pub use crate::source::PackageSource;
#[cfg(feature = "s3")]
pub use crate::source::S3Source;
use std::sync::Arc;

pub type SourceHandle = Arc<dyn PackageSource + Send + Sync>;
