//! Package source trait and implementations.
//!
//! A source is wherever published package revisions live. The trait is the
//! seam that keeps the transport protocol out of this crate: a source only
//! lists manifests and reads payload files, and the [`Installer`] does the
//! rest locally.
//!
//! [`Installer`]: crate::Installer

mod dir;
#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(feature = "s3")]
mod s3;

pub use self::dir::DirSource;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockSource;
#[cfg(feature = "s3")]
pub use self::s3::S3Source;
use crate::error::{ErrorKind, Result};
use crate::manifest::{Manifest, select};
use crate::package::PackageSpec;
use async_trait::async_trait;
use exn::OptionExt;
use std::path::Path;

/// Unified interface for package distribution sources.
///
/// All operations are asynchronous; remote sources do network I/O, the
/// directory source does filesystem I/O. The two required methods are
/// intentionally dumb — selector resolution is shared by the provided
/// [`resolve`](PackageSource::resolve).
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Name of the configured source (used for logging only).
    fn name(&self) -> &str;

    /// List every published revision manifest of a package.
    ///
    /// Returns [`PackageNotFound`](ErrorKind::PackageNotFound) when the
    /// source has no package by that name at all.
    async fn manifests(&self, package: &str) -> Result<Vec<Manifest>>;

    /// Read one payload file of the given revision.
    ///
    /// `path` is relative to the revision root and has already passed the
    /// payload-path guard when it came out of a parsed [`Manifest`].
    async fn read_file(&self, manifest: &Manifest, path: &Path) -> Result<Vec<u8>>;

    /// Resolve a spec to the manifest of one concrete revision.
    ///
    /// Lists the package's manifests and applies the spec's collapsed
    /// selector; when a mutable label matches several revisions the most
    /// recently published one wins.
    async fn resolve(&self, spec: &PackageSpec) -> Result<Manifest> {
        let manifests = self.manifests(spec.package()).await?;
        select(manifests, spec.selector()).ok_or_raise(|| ErrorKind::RevisionNotFound(spec.to_string()))
    }
}
