//! Filesystem package source.
//!
//! Serves packages from a local directory laid out as
//! `<root>/<namespace>/<name>/<revision>/` with a `manifest.json` next to
//! each revision's payload files. This is the transport-free reference
//! source: a shared package store on an NFS mount, a checkout of a data
//! repository, or the fixture directory of a test all work the same way.

use crate::error::{ErrorKind, Result};
use crate::manifest::{Manifest, validate_payload_path};
use crate::source::PackageSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

const MANIFEST_FILE: &str = "manifest.json";

/// Package source rooted at a local directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    name: String,
    root: PathBuf,
}

impl DirSource {
    /// Create a new directory source.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`](ErrorKind::InvalidPath) if the path is not an
    /// absolute path to an existing directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() || !root.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self { name: name.into(), root })
    }

    fn package_dir(&self, package: &str) -> Result<PathBuf> {
        // The package name doubles as a two-component relative path; run it
        // through the payload guard so `ns/../../etc` can't address outside
        // the store root.
        Ok(self.root.join(validate_payload_path(package)?))
    }
}

#[async_trait]
impl PackageSource for DirSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn manifests(&self, package: &str) -> Result<Vec<Manifest>> {
        let dir = self.package_dir(package)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                exn::bail!(ErrorKind::PackageNotFound(package.to_string()))
            },
            Err(err) => Err(ErrorKind::Io(err))?,
        };
        let mut manifests = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(ErrorKind::Io)? {
            let manifest_path = entry.path().join(MANIFEST_FILE);
            let bytes = match fs::read(&manifest_path).await {
                Ok(bytes) => bytes,
                // Revision directories without a manifest are half-written
                // installs or stray files; skip them.
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) if err.kind() == std::io::ErrorKind::NotADirectory => continue,
                Err(err) => Err(ErrorKind::Io(err))?,
            };
            manifests.push(Manifest::parse(&bytes)?);
        }
        Ok(manifests)
    }

    async fn read_file(&self, manifest: &Manifest, path: &Path) -> Result<Vec<u8>> {
        let validated = validate_payload_path(path)?;
        let full = self.package_dir(&manifest.package)?.join(&manifest.revision).join(validated);
        Ok(fs::read(&full).await.map_err(ErrorKind::Io)?)
    }
}
