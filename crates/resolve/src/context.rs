use crate::error::Result;
use crate::resolve::{Resolution, ResolveOptions};
use gibbs_cache::{Database, Session};
use gibbs_config::Config;
use gibbs_mol::{CompoundBuilder, MoleculeParser};
use gibbs_registry::{Installer, PackageSpec, SourceHandle};
use std::sync::Arc;

/// Shared handle to a molecule parser collaborator.
pub type ParserHandle = Arc<dyn MoleculeParser>;
/// Shared handle to a compound builder collaborator.
pub type BuilderHandle = Arc<dyn CompoundBuilder>;

/// The compound cache: one store, one session, and the collaborators needed
/// to keep them populated.
///
/// There is no hidden global. A host constructs exactly the caches it wants
/// via [`bootstrap`](CompoundCache::bootstrap), injecting the package source
/// and chemistry collaborators, and passes the context to whatever needs
/// compounds. [`refresh`](CompoundCache::refresh) swaps the store handle
/// inside the context, so callers holding the context never see a handle to
/// a deleted store file.
pub struct CompoundCache {
    pub(crate) config: Config,
    pub(crate) source: SourceHandle,
    pub(crate) installer: Installer,
    pub(crate) parser: ParserHandle,
    pub(crate) builder: BuilderHandle,
    pub(crate) database: Database,
    pub(crate) session: Session,
}

impl CompoundCache {
    /// Opens the compound cache, seeding the store from the package source
    /// on first use. See [`bootstrap::open_store`](crate::bootstrap::open_store).
    pub async fn bootstrap(
        config: Config,
        source: SourceHandle,
        parser: ParserHandle,
        builder: BuilderHandle,
    ) -> Result<Self> {
        let installer = Installer::new(config.install_dir());
        let (database, session) = crate::bootstrap::open_store(&config, source.as_ref(), &installer).await?;
        Ok(Self { config, source, installer, parser, builder, database, session })
    }

    /// Resolves a SMILES string to a compound record.
    /// See [`resolve::resolve_compound`](crate::resolve::resolve_compound).
    pub async fn resolve(&mut self, smiles: &str, options: ResolveOptions) -> Result<Resolution> {
        crate::resolve::resolve_compound(
            &mut self.session,
            self.parser.as_ref(),
            self.builder.as_ref(),
            smiles,
            options,
        )
        .await
    }

    /// Replaces the store wholesale with a fresh package export.
    /// See [`refresh::rebuild_store`](crate::refresh::rebuild_store).
    pub async fn refresh(&mut self, spec: Option<PackageSpec>, force: bool) -> Result<()> {
        crate::refresh::rebuild_store(self, spec, force).await
    }

    /// The live store handle, for direct repository queries.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// The live session, for committing or rolling back staged work.
    pub fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Provenance;
    use crate::tests::{installed_config, seeded_source, store_payload};
    use gibbs_cache::Repository;
    use gibbs_mol::MockChem;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_bootstrap_resolve_commit_round_trip() {
        let root = tempdir().unwrap();
        let payload = store_payload().await;
        let source = Arc::new(seeded_source(&payload));
        let chem = Arc::new(MockChem::with_entries([("CCO", "LFQSCWFLJHTTHZ-UHFFFAOYSA-N")]));
        let mut cache =
            CompoundCache::bootstrap(installed_config(root.path()), source, chem.clone(), chem)
                .await
                .unwrap();

        let created = cache.resolve("CCO", ResolveOptions::default()).await.unwrap();
        assert!(matches!(created.provenance, Provenance::Created));
        cache.session().commit().await.unwrap();

        let repo = Repository::from(cache.database());
        assert_eq!(repo.count().await.unwrap(), 1);
        let stored = repo.get_by_id(created.id.as_i64()).await.unwrap().unwrap();
        assert_eq!(stored.smiles, "CCO");
    }
}
