//! Read-side queries against committed compound data.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::CompoundRow;
use exn::ResultExt;
use gibbs_mol::{Compound, PartialInchiKey};
use sqlx::SqlitePool;

/// Repository for looking up compounds in the store.
///
/// Only sees committed data: compounds staged in an open [`Session`]
/// transaction are invisible here until the session commits. Use the
/// session's own search when staged rows must be considered.
///
/// [`Session`]: crate::Session
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find all compounds whose InChI key starts with the partial key.
    ///
    /// The partial key drops the protonation block, so protonation variants
    /// of the same skeleton all match. Results are ordered by ascending id:
    /// when several variants collide, the lowest identifier wins — an
    /// explicit tie-break, not an accident of query planning.
    ///
    /// A prefix `LIKE` is safe here: partial keys contain only `A-Z` and
    /// `-`, never SQL wildcards, and InChI key blocks are fixed-width so a
    /// 25-character prefix cannot straddle a block boundary.
    pub async fn search_by_partial_key(&self, partial: &PartialInchiKey) -> Result<Vec<Compound>> {
        let rows: Vec<CompoundRow> = sqlx::query_as(include_str!("../queries/search_by_partial_key.sql"))
            .bind(partial.as_str())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Compound::try_from).collect()
    }

    /// Get a compound by its store-assigned identifier.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Compound>> {
        let row: Option<CompoundRow> = sqlx::query_as(include_str!("../queries/get_by_id.sql"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(Compound::try_from).transpose()
    }

    /// Count all compounds in the store.
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/count_compounds.sql"))
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("compound count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gibbs_mol::InchiKey;

    fn compound(key: &str, smiles: &str) -> Compound {
        Compound::new(key.parse::<InchiKey>().unwrap(), smiles)
    }

    async fn seed(db: &Database, compounds: &[Compound]) {
        let mut session = crate::Session::new(db);
        for c in compounds {
            session.stage(c).await.unwrap();
        }
        session.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_store_finds_nothing() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        let partial = compound("XLYOFNOQVPJJNP-UHFFFAOYSA-N", "O").inchi_key.partial();
        assert!(repo.search_by_partial_key(&partial).await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_matches_protonation_variants() {
        let db = Database::connect_in_memory().await.unwrap();
        seed(
            &db,
            &[
                compound("XLYOFNOQVPJJNP-UHFFFAOYSA-N", "O"),
                compound("XLYOFNOQVPJJNP-UHFFFAOYSA-M", "[OH-]"),
                compound("WQZGKKKJIJFFOK-GASJEMHNSA-N", "C(C1C(C(C(C(O1)O)O)O)O)O"),
            ],
        )
        .await;
        let repo = Repository::from(&db);
        let partial = compound("XLYOFNOQVPJJNP-UHFFFAOYSA-N", "O").inchi_key.partial();
        let hits = repo.search_by_partial_key(&partial).await.unwrap();
        assert_eq!(hits.len(), 2);
        // Lowest id first: the deterministic tie-break.
        assert_eq!(hits[0].smiles, "O");
        assert_eq!(hits[1].smiles, "[OH-]");
        assert!(hits[0].id.unwrap() < hits[1].id.unwrap());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = Database::connect_in_memory().await.unwrap();
        seed(&db, &[compound("XLYOFNOQVPJJNP-UHFFFAOYSA-N", "O")]).await;
        let repo = Repository::from(&db);
        let found = repo.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(found.smiles, "O");
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }
}
