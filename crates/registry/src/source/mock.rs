//! In-memory package source for testing.

use crate::error::{ErrorKind, Result};
use crate::manifest::{Manifest, validate_payload_path};
use crate::source::PackageSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

type Payload = HashMap<PathBuf, Vec<u8>>;

/// In-memory package source for testing.
///
/// Holds published revisions in a `HashMap` and counts payload reads, so
/// tests can assert not only *what* was installed but *whether* the source
/// was contacted at all (the bootstrap and reuse paths care).
///
/// # Examples
///
/// ```
/// use gibbs_registry::{Manifest, MockSource};
///
/// let manifest = Manifest {
///     package: "equilibrator/cache".to_string(),
///     revision: "abc".to_string(),
///     tag: None,
///     version: None,
///     published_at: 100,
///     files: vec!["compounds.sqlite".to_string()],
/// };
/// let source = MockSource::default()
///     .with_package(manifest, [("compounds.sqlite", b"payload".to_vec())]);
/// assert_eq!(source.read_count(), 0);
/// ```
#[derive(Default)]
pub struct MockSource {
    packages: HashMap<String, Vec<(Manifest, Payload)>>,
    reads: AtomicUsize,
    failing: bool,
}

impl MockSource {
    /// Publish a revision to the mock source.
    ///
    /// Panics if a payload path fails validation or isn't listed in the
    /// manifest. If test setup is wrong, then the test should not pass.
    pub fn with_package(
        mut self,
        manifest: Manifest,
        files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>,
    ) -> Self {
        let mut payload = HashMap::new();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_payload_path(&path) else {
                panic!("MockSource::with_package: invalid payload path {}", path.display());
            };
            assert!(
                manifest.files.iter().any(|f| Path::new(f) == validated),
                "MockSource::with_package: {} not listed in manifest",
                validated.display()
            );
            payload.insert(validated, data.into());
        }
        self.packages.entry(manifest.package.clone()).or_default().push((manifest, payload));
        self
    }

    /// Make every subsequent source call fail with a network error.
    ///
    /// Simulates an unreachable distribution service, e.g. for asserting
    /// that a failed refresh leaves the old store untouched.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Number of payload files read so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<()> {
        if self.failing {
            exn::bail!(ErrorKind::Network("mock source is failing".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PackageSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn manifests(&self, package: &str) -> Result<Vec<Manifest>> {
        self.check_reachable()?;
        match self.packages.get(package) {
            Some(revisions) => Ok(revisions.iter().map(|(manifest, _)| manifest.clone()).collect()),
            None => exn::bail!(ErrorKind::PackageNotFound(package.to_string())),
        }
    }

    async fn read_file(&self, manifest: &Manifest, path: &Path) -> Result<Vec<u8>> {
        self.check_reachable()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        let revisions = match self.packages.get(&manifest.package) {
            Some(revisions) => revisions,
            None => exn::bail!(ErrorKind::PackageNotFound(manifest.package.clone())),
        };
        let payload = revisions
            .iter()
            .find(|(m, _)| m.revision == manifest.revision)
            .map(|(_, payload)| payload);
        match payload.and_then(|p| p.get(path)) {
            Some(data) => Ok(data.clone()),
            None => exn::bail!(ErrorKind::Io(std::io::Error::from(std::io::ErrorKind::NotFound))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageSpec;

    fn manifest() -> Manifest {
        Manifest {
            package: "equilibrator/cache".to_string(),
            revision: "abc".to_string(),
            tag: None,
            version: None,
            published_at: 100,
            files: vec!["compounds.sqlite".to_string()],
        }
    }

    #[tokio::test]
    async fn test_resolve_and_read() {
        let source = MockSource::default().with_package(manifest(), [("compounds.sqlite", b"payload".to_vec())]);
        let spec = PackageSpec::new("equilibrator/cache").unwrap();
        let resolved = source.resolve(&spec).await.unwrap();
        assert_eq!(resolved.revision, "abc");
        let data = source.read_file(&resolved, Path::new("compounds.sqlite")).await.unwrap();
        assert_eq!(data, b"payload");
        assert_eq!(source.read_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_source() {
        let source = MockSource::default().with_package(manifest(), [("compounds.sqlite", b"x".to_vec())]).failing();
        let spec = PackageSpec::new("equilibrator/cache").unwrap();
        let err = source.resolve(&spec).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
        assert_eq!(source.read_count(), 0);
    }

    #[test]
    #[should_panic(expected = "not listed in manifest")]
    fn test_unlisted_payload_panics() {
        let _ = MockSource::default().with_package(manifest(), [("extra.bin", b"x".to_vec())]);
    }
}
