use crate::context::CompoundCache;
use crate::error::{ErrorKind as ResolverErrorKind, Result as ResolverResult};
use crate::refresh::error::{ErrorKind, Result as RefreshResult};
use exn::ResultExt;
use gibbs_cache::{Database, Session};
use gibbs_registry::PackageSpec;
use tokio::fs;

/// Replaces the local compound store wholesale with a fresh package export.
///
/// The order of operations is load-bearing. The package is fetched *first*:
/// if the source is unreachable or the revision missing, the existing store
/// stays untouched and usable. Only after a successful install is the old
/// handle closed, the cache directory cleared and recreated, the payload
/// exported, and a new `Database`/`Session` pair swapped into the context —
/// so every operation after a refresh sees the new store, never a stale
/// handle. Uncommitted session work is discarded.
///
/// With `spec = None` the configured default package is fetched. `force`
/// is forwarded to the installer; pass `true` to re-download a revision
/// that is already in the install area.
pub async fn rebuild_store(
    cache: &mut CompoundCache,
    spec: Option<PackageSpec>,
    force: bool,
) -> ResolverResult<()> {
    rebuild_store_inner(cache, spec, force).await.or_raise(|| ResolverErrorKind::Refresh)
}

pub(crate) async fn rebuild_store_inner(
    cache: &mut CompoundCache,
    spec: Option<PackageSpec>,
    force: bool,
) -> RefreshResult<()> {
    let spec = match spec {
        Some(spec) => spec,
        None => PackageSpec::new(&cache.config.registry.default_package).or_raise(|| ErrorKind::Registry)?,
    };
    tracing::info!(package = %spec, force, "rebuilding compound store from data package");
    let installed =
        cache.installer.install(cache.source.as_ref(), &spec, force).await.or_raise(|| ErrorKind::Registry)?;
    // Install succeeded; now it is safe to tear the old store down.
    cache.session.rollback().await.or_raise(|| ErrorKind::Store)?;
    cache.database.close().await;
    match fs::remove_dir_all(&cache.config.cache.dir).await {
        Ok(()) => {},
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
        Err(err) => Err(ErrorKind::Layout(err))?,
    }
    fs::create_dir_all(&cache.config.cache.dir).await.map_err(ErrorKind::Layout)?;
    installed.export(&cache.config.cache.dir).await.or_raise(|| ErrorKind::Registry)?;
    let database = Database::connect(cache.config.sqlite_path()).await.or_raise(|| ErrorKind::Store)?;
    cache.session = Session::new(&database);
    cache.database = database;
    tracing::info!(store = %cache.config.sqlite_path().display(), "compound store rebuilt");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{Provenance, ResolveOptions};
    use crate::tests::{installed_config, seeded_source, store_payload};
    use gibbs_cache::Repository;
    use gibbs_mol::MockChem;
    use std::sync::Arc;
    use tempfile::tempdir;

    const WATER_KEY: &str = "XLYOFNOQVPJJNP-UHFFFAOYSA-N";

    async fn booted(root: &std::path::Path, source: Arc<gibbs_registry::MockSource>) -> CompoundCache {
        let chem = Arc::new(MockChem::with_entries([("O", WATER_KEY)]));
        CompoundCache::bootstrap(installed_config(root), source, chem.clone(), chem).await.unwrap()
    }

    #[tokio::test]
    async fn test_refresh_replaces_store_contents() {
        let root = tempdir().unwrap();
        let payload = store_payload().await;
        let source = Arc::new(seeded_source(&payload));
        let mut cache = booted(root.path(), source.clone()).await;
        let options = ResolveOptions { auto_commit: true, ..Default::default() };
        cache.resolve("O", options).await.unwrap();
        assert_eq!(Repository::from(cache.database()).count().await.unwrap(), 1);

        cache.refresh(None, true).await.unwrap();
        // The exported package payload is an empty store again.
        assert_eq!(Repository::from(cache.database()).count().await.unwrap(), 0);
        assert_eq!(source.read_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_old_store_untouched() {
        let root = tempdir().unwrap();
        let config = installed_config(root.path());
        // Pre-seed the store so bootstrap never needs the (failing) source.
        std::fs::create_dir_all(&config.cache.dir).unwrap();
        std::fs::write(config.sqlite_path(), store_payload().await).unwrap();
        let source = Arc::new(seeded_source(b"unused").failing());
        let chem = Arc::new(MockChem::with_entries([("O", WATER_KEY)]));
        let mut cache =
            CompoundCache::bootstrap(config, source.clone(), chem.clone(), chem).await.unwrap();
        let options = ResolveOptions { auto_commit: true, ..Default::default() };
        cache.resolve("O", options).await.unwrap();

        let err = cache.refresh(None, true).await.unwrap_err();
        assert!(matches!(&*err, ResolverErrorKind::Refresh));
        // The old store is still there, open, and holds its compound.
        assert_eq!(Repository::from(cache.database()).count().await.unwrap(), 1);
        let hit = cache.resolve("O", ResolveOptions::default()).await.unwrap();
        assert!(matches!(hit.provenance, Provenance::CacheHit));
    }

    #[tokio::test]
    async fn test_refresh_discards_uncommitted_work() {
        let root = tempdir().unwrap();
        let payload = store_payload().await;
        let source = Arc::new(seeded_source(&payload));
        let mut cache = booted(root.path(), source.clone()).await;
        cache.resolve("O", ResolveOptions::default()).await.unwrap();
        assert!(cache.session().has_staged());

        cache.refresh(None, true).await.unwrap();
        assert!(!cache.session().has_staged());
        let again = cache.resolve("O", ResolveOptions::default()).await.unwrap();
        assert!(matches!(again.provenance, Provenance::Created));
    }
}
