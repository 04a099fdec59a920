pub mod sql;

use thiserror::Error;
use turso::Database;

/// Custom error types for the SQLite storage provider.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage connection failed: {0}")]
    Connection(String),
    #[error("Storage operation failed: {0}")]
    Operation(String),
}

/// A provider for interacting with a local SQLite database using Turso.
///
/// This provider holds a `Database` instance, which manages a connection
/// pool. When cloned, it shares the same underlying database, allowing
/// concurrent access to the same file or in-memory instance.
#[derive(Clone)]
pub struct SqliteProvider {
    pub db: Database,
}

impl SqliteProvider {
    /// Creates a new `SqliteProvider` from a file path or in-memory.
    ///
    /// Use ":memory:" for a unique, isolated in-memory database; to share
    /// one across instances (e.g., in tests), create one provider and
    /// `.clone()` it.
    pub async fn new(db_path: &str) -> Result<Self, StorageError> {
        let db = turso::Builder::new_local(db_path)
            .build()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        // WAL mode helps concurrent file-based access; it is a no-op for
        // in-memory databases. PRAGMA returns a row, so use `query`.
        let conn = db
            .connect()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        conn.query("PRAGMA journal_mode=WAL;", ())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self { db })
    }

    /// A helper for tests to pre-populate data by executing multiple SQL
    /// statements.
    pub async fn initialize_with_data(&self, init_sql: &str) -> Result<(), StorageError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for statement in init_sql.split(';').filter(|s| !s.trim().is_empty()) {
            conn.execute(statement, ())
                .await
                .map_err(|e| StorageError::Operation(e.to_string()))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for SqliteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteProvider").finish_non_exhaustive()
    }
}

impl AsRef<Database> for SqliteProvider {
    fn as_ref(&self) -> &Database {
        &self.db
    }
}
