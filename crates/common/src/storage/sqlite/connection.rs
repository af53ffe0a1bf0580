//! SQLite connection wrapper

use std::ops::{Deref, DerefMut};

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection as RusqliteConnection, OptionalExtension, Params, Row, Transaction};
use tracing::instrument;

use crate::storage::error::{StorageError, StorageResult};

/// Pooled rusqlite connection
///
/// The connection is returned to the pool when dropped. Derefs to
/// [`rusqlite::Connection`] for anything the helpers below do not cover.
pub struct SqliteConnection {
    inner: PooledConnection<SqliteConnectionManager>,
}

impl SqliteConnection {
    /// Create a new connection wrapper from a pooled connection
    pub fn new(conn: PooledConnection<SqliteConnectionManager>) -> Self {
        Self { inner: conn }
    }

    /// Execute a statement that returns no rows
    #[instrument(skip(self, params), fields(sql = %sql))]
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> StorageResult<usize> {
        self.inner.execute(sql, params).map_err(StorageError::from)
    }

    /// Execute a query that returns exactly one row
    #[instrument(skip(self, params, f), fields(sql = %sql))]
    pub fn query_row<T, P, F>(&self, sql: &str, params: P, f: F) -> StorageResult<T>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        self.inner.query_row(sql, params, f).map_err(StorageError::from)
    }

    /// Execute a query that returns at most one row
    #[instrument(skip(self, params, f), fields(sql = %sql))]
    pub fn query_optional<T, P, F>(&self, sql: &str, params: P, f: F) -> StorageResult<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        self.inner.query_row(sql, params, f).optional().map_err(StorageError::from)
    }

    /// Execute a query and collect every mapped row
    #[instrument(skip(self, params, f), fields(sql = %sql))]
    pub fn query_all<T, P, F>(&self, sql: &str, params: P, f: F) -> StorageResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        let mut stmt = self.inner.prepare(sql)?;
        let rows = stmt.query_map(params, f)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StorageError::from)
    }

    /// Begin a deferred transaction; rolled back on drop unless committed
    #[instrument(skip(self))]
    pub fn transaction(&mut self) -> StorageResult<Transaction<'_>> {
        self.inner.transaction().map_err(StorageError::from)
    }
}

impl Deref for SqliteConnection {
    type Target = RusqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SqliteConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for storage::sqlite::connection.
    use rusqlite::params;
    use tempfile::TempDir;

    use crate::storage::sqlite::{SqlitePool, SqlitePoolConfig};

    fn pool(dir: &TempDir) -> SqlitePool {
        SqlitePool::new(&dir.path().join("test.db"), SqlitePoolConfig::default()).unwrap()
    }

    #[test]
    fn test_execute_and_query_row() {
        let temp_dir = TempDir::new().unwrap();
        let conn = pool(&temp_dir).get_connection().unwrap();

        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT)", []).unwrap();
        let inserted = conn.execute("INSERT INTO test (name) VALUES (?1)", params!["Bob"]).unwrap();
        assert_eq!(inserted, 1);

        let name: String =
            conn.query_row("SELECT name FROM test WHERE id = ?1", params![1], |row| row.get(0))
                .unwrap();
        assert_eq!(name, "Bob");
    }

    #[test]
    fn test_query_optional_returns_none_for_no_rows() {
        let temp_dir = TempDir::new().unwrap();
        let conn = pool(&temp_dir).get_connection().unwrap();
        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY)", []).unwrap();

        let missing: Option<i64> = conn
            .query_optional("SELECT id FROM test WHERE id = ?1", params![42], |row| row.get(0))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_dropped_transaction_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        let mut conn = pool(&temp_dir).get_connection().unwrap();
        conn.execute("CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT)", []).unwrap();

        {
            let tx = conn.transaction().unwrap();
            tx.execute("INSERT INTO test (name) VALUES ('Charlie')", []).unwrap();
        }

        let names: Vec<String> =
            conn.query_all("SELECT name FROM test", [], |row| row.get(0)).unwrap();
        assert!(names.is_empty());
    }
}
