use crate::error::{ErrorKind as ResolverErrorKind, Result as ResolverResult};
use crate::resolve::error::{ErrorKind, Result as ResolveResult};
use exn::ResultExt;
use gibbs_cache::Session;
use gibbs_mol::{Compound, CompoundBuilder, CompoundId, MoleculeParser};

/// Indicates whether a [`Resolution`] came out of the store or was built.
///
/// Distinguishes between cache hits and actual construction work, which is
/// useful for progress reporting and for callers that treat freshly built
/// compounds differently (e.g. review before commit).
#[derive(Debug)]
pub enum Provenance {
    /// A compound with the same partial InChI key already existed in the
    /// store (or was staged earlier in this session) — the builder was never
    /// invoked.
    CacheHit,
    /// No match existed; the builder constructed a new compound from the
    /// full SMILES string.
    Created,
}

/// The result of resolving a single SMILES string.
#[derive(Debug)]
pub struct Resolution {
    pub compound: Compound,
    /// Always usable: [`Stored`](CompoundId::Stored) when the store assigned
    /// a rowid, [`Ephemeral`](CompoundId::Ephemeral) for compounds built but
    /// never staged.
    pub id: CompoundId,
    pub provenance: Provenance,
}

/// Knobs for [`resolve_compound`].
#[derive(Clone, Copy, Debug)]
pub struct ResolveOptions {
    /// Stage newly built compounds into the session so later resolves in
    /// the same session find them.
    pub update_cache: bool,
    /// Additionally commit the session after staging, making the new
    /// compound durable immediately.
    pub auto_commit: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { update_cache: true, auto_commit: false }
    }
}

/// Resolves a SMILES string to a compound record, building one on a miss.
///
/// The lookup key is the *partial* InChI key — everything before the final
/// hyphen — so protonation and stereochemistry variants of an already-known
/// compound resolve to the existing record instead of a duplicate. When
/// several records share a partial key the one with the lowest identifier
/// wins; identifiers are assigned in insertion order, so the oldest record
/// is the canonical one.
///
/// Searches go through the session's open transaction, which means a
/// compound staged by an earlier resolve is found by a later one even
/// before anything is committed.
pub async fn resolve_compound(
    session: &mut Session,
    parser: &dyn MoleculeParser,
    builder: &dyn CompoundBuilder,
    smiles: &str,
    options: ResolveOptions,
) -> ResolverResult<Resolution> {
    resolve_compound_inner(session, parser, builder, smiles, options)
        .await
        .or_raise(|| ResolverErrorKind::Resolve)
}

pub(crate) async fn resolve_compound_inner(
    session: &mut Session,
    parser: &dyn MoleculeParser,
    builder: &dyn CompoundBuilder,
    smiles: &str,
    options: ResolveOptions,
) -> ResolveResult<Resolution> {
    let key = parser.inchi_key(smiles).or_raise(|| ErrorKind::Parse)?;
    let partial = key.partial();
    let hits = session.search_by_partial_key(&partial).await.or_raise(|| ErrorKind::Store)?;
    // Hits arrive ordered by ascending id; the first is the canonical record.
    if let Some(compound) = hits.into_iter().next() {
        let id = CompoundId::from(compound.id);
        tracing::debug!(partial = %partial, id = id.as_i64(), "compound cache hit");
        return Ok(Resolution { compound, id, provenance: Provenance::CacheHit });
    }
    // The builder gets the full original SMILES, never the truncated key.
    let mut compound = builder.build(smiles).or_raise(|| ErrorKind::Build)?;
    let id = if options.update_cache {
        let id = session.stage(&compound).await.or_raise(|| ErrorKind::Store)?;
        compound.id = Some(id);
        if options.auto_commit {
            session.commit().await.or_raise(|| ErrorKind::Store)?;
        }
        CompoundId::Stored(id)
    } else {
        CompoundId::Ephemeral
    };
    tracing::debug!(inchi_key = %compound.inchi_key, id = id.as_i64(), "compound built");
    Ok(Resolution { compound, id, provenance: Provenance::Created })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gibbs_cache::{Database, Repository, Session};
    use gibbs_mol::MockChem;

    const WATER_KEY: &str = "XLYOFNOQVPJJNP-UHFFFAOYSA-N";
    // Same partial key as WATER_KEY, different protonation suffix.
    const HYDROXIDE_KEY: &str = "XLYOFNOQVPJJNP-UHFFFAOYSA-M";
    const ETHANOL_KEY: &str = "LFQSCWFLJHTTHZ-UHFFFAOYSA-N";

    fn chem() -> MockChem {
        MockChem::with_entries([
            ("O", WATER_KEY),
            ("[OH-]", HYDROXIDE_KEY),
            ("CCO", ETHANOL_KEY),
        ])
    }

    #[tokio::test]
    async fn test_miss_builds_and_stages() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut session = Session::new(&db);
        let chem = chem();
        let resolution =
            resolve_compound(&mut session, &chem, &chem, "O", ResolveOptions::default()).await.unwrap();
        assert!(matches!(resolution.provenance, Provenance::Created));
        assert_eq!(resolution.id, CompoundId::Stored(1));
        assert_eq!(resolution.compound.id, Some(1));
        assert_eq!(resolution.compound.smiles, "O");
    }

    #[tokio::test]
    async fn test_repeated_resolve_is_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut session = Session::new(&db);
        let chem = chem();
        let first =
            resolve_compound(&mut session, &chem, &chem, "O", ResolveOptions::default()).await.unwrap();
        let second =
            resolve_compound(&mut session, &chem, &chem, "O", ResolveOptions::default()).await.unwrap();
        assert!(matches!(second.provenance, Provenance::CacheHit));
        assert_eq!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_protonation_variant_resolves_to_existing_record() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut session = Session::new(&db);
        let chem = chem();
        let water =
            resolve_compound(&mut session, &chem, &chem, "O", ResolveOptions::default()).await.unwrap();
        let hydroxide =
            resolve_compound(&mut session, &chem, &chem, "[OH-]", ResolveOptions::default()).await.unwrap();
        assert!(matches!(hydroxide.provenance, Provenance::CacheHit));
        assert_eq!(hydroxide.id, water.id);
        // The stored record keeps the original SMILES, not the variant's.
        assert_eq!(hydroxide.compound.smiles, "O");
    }

    #[tokio::test]
    async fn test_distinct_compounds_get_distinct_records() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut session = Session::new(&db);
        let chem = chem();
        let water =
            resolve_compound(&mut session, &chem, &chem, "O", ResolveOptions::default()).await.unwrap();
        let ethanol =
            resolve_compound(&mut session, &chem, &chem, "CCO", ResolveOptions::default()).await.unwrap();
        assert!(matches!(ethanol.provenance, Provenance::Created));
        assert_ne!(ethanol.id, water.id);
    }

    #[tokio::test]
    async fn test_update_cache_false_never_mutates_the_store() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut session = Session::new(&db);
        let chem = chem();
        let options = ResolveOptions { update_cache: false, ..Default::default() };
        let resolution = resolve_compound(&mut session, &chem, &chem, "O", options).await.unwrap();
        assert!(matches!(resolution.provenance, Provenance::Created));
        assert_eq!(resolution.id, CompoundId::Ephemeral);
        assert_eq!(resolution.id.as_i64(), -1);
        assert!(!session.has_staged());
        // Nothing staged means no open transaction, so the pool is free.
        let repo = Repository::from(&db);
        assert_eq!(repo.count().await.unwrap(), 0);
        // Without staging, resolving again builds again.
        let again = resolve_compound(&mut session, &chem, &chem, "O", options).await.unwrap();
        assert!(matches!(again.provenance, Provenance::Created));
    }

    #[tokio::test]
    async fn test_auto_commit_makes_compound_durable() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut session = Session::new(&db);
        let chem = chem();
        let options = ResolveOptions { auto_commit: true, ..Default::default() };
        resolve_compound(&mut session, &chem, &chem, "O", options).await.unwrap();
        assert!(!session.has_staged());
        let repo = Repository::from(&db);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_smiles_is_fatal() {
        let db = Database::connect_in_memory().await.unwrap();
        let mut session = Session::new(&db);
        let chem = chem();
        let err = resolve_compound(&mut session, &chem, &chem, "not-smiles", ResolveOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(&*err, ResolverErrorKind::Resolve));
        assert!(!session.has_staged());
    }
}
