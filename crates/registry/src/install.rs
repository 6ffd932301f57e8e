//! Local install area management.
//!
//! Installing a package pulls one resolved revision out of a source and
//! lays it down under `<install_root>/<namespace>/<name>/<revision>/`, with
//! the manifest written last as the completion marker. Exporting copies an
//! installed revision's payload into an arbitrary destination directory —
//! that's how the compound store file ends up in the cache directory.

use crate::error::{ErrorKind, Result};
use crate::manifest::{Manifest, validate_payload_path};
use crate::package::PackageSpec;
use crate::source::PackageSource;
use std::path::{Path, PathBuf};
use tokio::fs;

const MANIFEST_FILE: &str = "manifest.json";

/// Fetches package revisions into a local install area.
#[derive(Debug, Clone)]
pub struct Installer {
    root: PathBuf,
}

impl Installer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where a resolved revision lives in the install area.
    fn revision_dir(&self, manifest: &Manifest) -> PathBuf {
        let (namespace, name) = manifest.parts();
        self.root.join(namespace).join(name).join(&manifest.revision)
    }

    /// Install the revision selected by `spec` from the source.
    ///
    /// With `force = false` a previously completed install of the same
    /// revision is reused without reading any payload from the source (the
    /// manifest still has to be resolved to know *which* revision). With
    /// `force = true` the payload is always re-fetched.
    ///
    /// Payload files are written before the manifest, so an interrupted
    /// install never masquerades as a complete one.
    pub async fn install(&self, source: &dyn PackageSource, spec: &PackageSpec, force: bool) -> Result<Installed> {
        let manifest = source.resolve(spec).await?;
        let dir = self.revision_dir(&manifest);
        let marker = dir.join(MANIFEST_FILE);
        if !force && fs::try_exists(&marker).await.map_err(ErrorKind::Io)? {
            tracing::debug!(package = %spec, revision = %manifest.revision, "reusing installed package");
            return Ok(Installed { manifest, dir });
        }

        tracing::info!(source = source.name(), package = %spec, revision = %manifest.revision, "installing package");
        fs::create_dir_all(&dir).await.map_err(ErrorKind::Io)?;
        for file in &manifest.files {
            let relative = validate_payload_path(file)?;
            let data = source.read_file(&manifest, &relative).await?;
            let target = dir.join(&relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await.map_err(ErrorKind::Io)?;
            }
            fs::write(&target, &data).await.map_err(ErrorKind::Io)?;
        }
        fs::write(&marker, manifest.to_json()?).await.map_err(ErrorKind::Io)?;
        Ok(Installed { manifest, dir })
    }
}

/// A completed install of one package revision.
#[derive(Debug, Clone)]
pub struct Installed {
    pub manifest: Manifest,
    /// Revision directory inside the install area.
    pub dir: PathBuf,
}

impl Installed {
    /// Copy the payload files into a destination directory.
    ///
    /// The destination must already exist; parent directories for nested
    /// payload paths are created as needed.
    pub async fn export(&self, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        for file in &self.manifest.files {
            let relative = validate_payload_path(file)?;
            let target = dest.join(&relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await.map_err(ErrorKind::Io)?;
            }
            fs::copy(self.dir.join(&relative), &target).await.map_err(ErrorKind::Io)?;
        }
        tracing::info!(package = %self.manifest.package, revision = %self.manifest.revision, dest = %dest.display(), "exported package payload");
        Ok(())
    }
}
