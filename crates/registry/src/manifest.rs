use crate::error::{ErrorKind, Result};
use crate::package::Selector;
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Describes one published revision of a data package.
///
/// Stored as `manifest.json` alongside the payload, both in sources and in
/// the local install area. The `revision` string (a content hash) names the
/// revision directory and is the only immutable handle; `tag` and `version`
/// are labels the publisher may move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Full `namespace/name` package name.
    pub package: String,
    /// Content hash identifying this revision.
    pub revision: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Unix timestamp of publication; newest wins for `Latest` selection.
    pub published_at: i64,
    /// Payload files, relative to the revision root.
    pub files: Vec<String>,
}

impl Manifest {
    /// Parse a `manifest.json` blob and validate its payload paths.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let manifest: Self = serde_json::from_slice(bytes).or_raise(|| ErrorKind::InvalidManifest)?;
        let mut parts = manifest.package.split('/');
        if !matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(ns), Some(name), None) if !ns.is_empty() && !name.is_empty()
        ) {
            exn::bail!(ErrorKind::InvalidManifest);
        }
        for file in &manifest.files {
            validate_payload_path(file)?;
        }
        Ok(manifest)
    }

    /// The namespace and name halves of the package name.
    pub fn parts(&self) -> (&str, &str) {
        self.package.split_once('/').unwrap_or((&self.package, ""))
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).or_raise(|| ErrorKind::InvalidManifest)
    }

    /// Whether this revision is named by the given selector.
    pub fn matches(&self, selector: Selector<'_>) -> bool {
        match selector {
            Selector::Hash(hash) => self.revision == hash,
            Selector::Tag(tag) => self.tag.as_deref() == Some(tag),
            Selector::Version(version) => self.version.as_deref() == Some(version),
            Selector::Latest => true,
        }
    }
}

/// Pick the matching revision from a set of published manifests.
///
/// Tags and versions may match several revisions (labels move); the most
/// recently published match wins. Returns `None` when nothing matches.
pub(crate) fn select(manifests: Vec<Manifest>, selector: Selector<'_>) -> Option<Manifest> {
    manifests
        .into_iter()
        .filter(|m| m.matches(selector))
        .max_by_key(|m| (m.published_at, m.revision.clone()))
}

/// Reject payload paths that could escape the revision directory.
///
/// Same contract as a storage path guard: relative, no `..` that climbs out,
/// no null bytes, no Windows prefixes, non-empty after normalization.
pub(crate) fn validate_payload_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but
                // cause truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir => {},
            Component::RootDir | Component::Prefix(_) => {
                exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()))
            },
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}
