use crate::bootstrap::error::{ErrorKind, Result as BootstrapResult};
use crate::error::{ErrorKind as ResolverErrorKind, Result as ResolverResult};
use exn::ResultExt;
use gibbs_cache::{Database, Session};
use gibbs_config::Config;
use gibbs_registry::{Installer, PackageSpec, PackageSource};
use tokio::fs;

/// Opens the local compound store, seeding it from the package source first
/// if no store file exists yet.
///
/// A present store file is trusted as-is and the source is never contacted;
/// use [`rebuild_store`](crate::refresh::rebuild_store) to replace it
/// wholesale. An absent one triggers the full seed: create the cache
/// directory, install the configured default package (forced, so a stale
/// local revision never wins), and export its payload next to where the
/// store file belongs.
pub async fn open_store(
    config: &Config,
    source: &dyn PackageSource,
    installer: &Installer,
) -> ResolverResult<(Database, Session)> {
    open_store_inner(config, source, installer).await.or_raise(|| ResolverErrorKind::Bootstrap)
}

pub(crate) async fn open_store_inner(
    config: &Config,
    source: &dyn PackageSource,
    installer: &Installer,
) -> BootstrapResult<(Database, Session)> {
    let store = config.sqlite_path();
    if fs::try_exists(&store).await.map_err(ErrorKind::Layout)? {
        tracing::info!(store = %store.display(), "local compound store found, skipping download");
    } else {
        let spec = PackageSpec::new(&config.registry.default_package).or_raise(|| ErrorKind::Registry)?;
        tracing::info!(package = %spec, source = source.name(), "compound store missing, downloading data package");
        fs::create_dir_all(&config.cache.dir).await.map_err(ErrorKind::Layout)?;
        let installed = installer.install(source, &spec, true).await.or_raise(|| ErrorKind::Registry)?;
        installed.export(&config.cache.dir).await.or_raise(|| ErrorKind::Registry)?;
        tracing::info!(store = %store.display(), "data package exported");
    }
    let database = Database::connect(&store).await.or_raise(|| ErrorKind::Store)?;
    let session = Session::new(&database);
    Ok((database, session))
}
