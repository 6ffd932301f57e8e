//! Database connection and pool management.

use exn::ResultExt;
use sqlx::SqliteConnection;
use sqlx::pool::PoolConnectionMetadata;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Embedded migrations that are run automatically on connect.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
// The store is read-mostly: many partial-key lookups, the occasional staged
// compound. A handful of connections is plenty.
const MAX_CONNECTIONS: u32 = 4;

/// Connection pool for the compound store.
///
/// This is the entry point for everything that touches the SQLite file. The
/// resolver holds exactly one of these per cache directory; refresh swaps it
/// out wholesale rather than mutating it.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn new(options: SqliteConnectOptions, max: Option<u32>) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            // Query-based PRAGMAs must be applied to every connection the
            // pool opens, not just the first one handed back.
            .after_connect(|conn, meta| Box::pin(async move { Self::apply_pragmas(conn, meta).await }))
            .max_connections(max.unwrap_or(MAX_CONNECTIONS))
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Connect to the compound store at the given path.
    ///
    /// Creates the database file if it doesn't exist and runs migrations.
    /// The containing directory must already exist; creating it is the
    /// bootstrapper's job, not the store's.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = Self::base_options().filename(path).create_if_missing(true);
        Self::new(options, None).await
    }

    /// Connect to an in-memory store (useful for testing).
    ///
    /// Note:
    /// - In-memory databases are destroyed when the connection closes.
    /// - Do NOT apply `#[cfg(test)]` so that other crates can also use this in their tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = Self::base_options().filename(":memory:");
        // An in-memory database must either share one cache across
        // connections or be limited to a single connection, otherwise each
        // pooled connection sees its own empty database.
        Self::new(options, Some(1)).await
    }

    /// Base connection options shared between file and in-memory stores.
    fn base_options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            // WAL keeps partial-key lookups readable while a session holds
            // an open staging transaction.
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .foreign_keys(true)
            // PRAGMA synchronous = NORMAL (balance between safety and speed)
            .synchronous(SqliteSynchronous::Normal)
            // A second handle on the same store file (e.g. a verification
            // read during tests) shouldn't fail instantly on SQLITE_BUSY.
            .busy_timeout(std::time::Duration::from_millis(1500))
    }

    /// Apply PRAGMA settings that aren't exposed via `SqliteConnectOptions`.
    async fn apply_pragmas(conn: &mut SqliteConnection, _meta: PoolConnectionMetadata) -> sqlx::Result<()> {
        sqlx::query(
            r#"
                PRAGMA temp_store = MEMORY;
                PRAGMA cache_size = -4096;
            "#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Run database migrations.
    ///
    /// This is called automatically by `connect` and `connect_in_memory`,
    /// but can be called manually if needed.
    #[instrument("performing compound store migrations")]
    async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.or_raise(|| ErrorKind::Migration)
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool.
    ///
    /// Waits for all connections to be returned and then closes them. The
    /// refresher calls this before deleting the store file out from under
    /// the pool.
    pub async fn close(&self) {
        // Let SQLite update query planner statistics
        _ = sqlx::query("PRAGMA optimize").execute(&self.pool).await;
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_in_memory() {
        let db = Database::connect_in_memory().await.unwrap();
        assert!(!db.pool().is_closed());
        db.close().await;
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.close().await;
    }

    #[tokio::test]
    async fn test_connect_creates_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compounds.sqlite");
        let db = Database::connect(&path).await.unwrap();
        assert!(path.is_file());
        db.close().await;
    }

    #[tokio::test]
    async fn test_pragmas_are_applied() {
        let db = Database::connect_in_memory().await.unwrap();
        // Set by SqliteConnectOptions
        let row: (i64,) = sqlx::query_as("PRAGMA foreign_keys").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, 1, "foreign_keys should be ON");
        // Set by after_connect()
        let row: (i64,) = sqlx::query_as("PRAGMA temp_store").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, 2, "temp_store should be MEMORY");
        db.close().await;
    }
}
