//! Transactional write side of the compound store.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::CompoundRow;
use exn::ResultExt;
use gibbs_mol::{Compound, PartialInchiKey};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// A staging session over the compound store.
///
/// Mirrors the stage/flush/commit protocol the resolver needs: [`stage`]
/// inserts a compound inside a lazily-opened transaction and immediately
/// returns the store-assigned rowid (flush semantics — the row is visible to
/// queries made *through this session*, but the store file's durable content
/// is unchanged). [`commit`] makes all staged work durable in one step.
///
/// Dropping a session with an open transaction discards the staged work;
/// there is no implicit commit.
///
/// [`stage`]: Session::stage
/// [`commit`]: Session::commit
#[derive(Debug)]
pub struct Session {
    pool: SqlitePool,
    tx: Option<Transaction<'static, Sqlite>>,
}

impl Session {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
            tx: None,
        }
    }

    /// Whether the session currently holds staged, uncommitted work.
    pub fn has_staged(&self) -> bool {
        self.tx.is_some()
    }

    /// Find all compounds whose InChI key starts with the partial key,
    /// including compounds staged in this session.
    ///
    /// Same ordering contract as [`Repository::search_by_partial_key`]
    /// (ascending id, lowest wins): staged rows take ids after committed
    /// ones, so a committed match still shadows a staged duplicate.
    ///
    /// [`Repository::search_by_partial_key`]: crate::Repository::search_by_partial_key
    pub async fn search_by_partial_key(&mut self, partial: &PartialInchiKey) -> Result<Vec<Compound>> {
        let query = sqlx::query_as::<_, CompoundRow>(include_str!("../queries/search_by_partial_key.sql"))
            .bind(partial.as_str());
        let rows = match &mut self.tx {
            Some(tx) => query.fetch_all(&mut **tx).await,
            None => query.fetch_all(&self.pool).await,
        }
        .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Compound::try_from).collect()
    }

    /// Stage a compound for insertion and return its assigned identifier.
    ///
    /// Opens the session transaction if none is open yet. The returned id is
    /// real (assigned by SQLite inside the transaction) but evaporates if
    /// the session is rolled back or dropped instead of committed.
    pub async fn stage(&mut self, compound: &Compound) -> Result<i64> {
        let tx = match &mut self.tx {
            Some(tx) => tx,
            None => {
                let tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
                self.tx.insert(tx)
            },
        };
        let id: i64 = sqlx::query_scalar(include_str!("../queries/insert_compound.sql"))
            .bind(compound.inchi_key.as_str())
            .bind(&compound.smiles)
            .bind(&compound.name)
            .bind(compound.created_at.unix_timestamp())
            .fetch_one(&mut **tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        tracing::debug!(id, inchi_key = %compound.inchi_key, "staged compound");
        Ok(id)
    }

    /// Commit all staged work, making it durable.
    ///
    /// Returns [`NoTransaction`](ErrorKind::NoTransaction) if nothing was
    /// staged; committing an empty session is a caller bug worth surfacing.
    pub async fn commit(&mut self) -> Result<()> {
        match self.tx.take() {
            Some(tx) => tx.commit().await.or_raise(|| ErrorKind::Database),
            None => exn::bail!(ErrorKind::NoTransaction),
        }
    }

    /// Discard all staged work.
    ///
    /// A no-op when nothing is staged.
    pub async fn rollback(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await.or_raise(|| ErrorKind::Database)?;
        }
        Ok(())
    }
}
