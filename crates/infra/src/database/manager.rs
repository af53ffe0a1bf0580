//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use studysync_common::storage::{
    HealthStatus, SqliteConnection, SqlitePool, SqlitePoolConfig, StorageError,
};
use studysync_domain::{DatabaseConfig, Result, StudySyncError};
use tokio::task;
use tracing::{info, warn};

use crate::errors::InfraError;

/// Stored in `PRAGMA user_version` once the schema is applied.
pub const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps a [`SqlitePool`].
#[derive(Debug)]
pub struct DbManager {
    pool: SqlitePool,
    path: PathBuf,
}

impl DbManager {
    /// Open (or create) the database with the given pool size.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32, busy_timeout_ms: u64) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        let config = SqlitePoolConfig::new(pool_size.max(1), busy_timeout_ms);
        let pool = SqlitePool::new(&path, config).map_err(InfraError::from)?;

        info!(
            db_path = %path.display(),
            max_connections = pool.config().max_size,
            "sqlite pool initialised"
        );

        Ok(Self { pool, path })
    }

    /// Open the database described by `config`.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::new(&config.path, config.pool_size, config.busy_timeout_ms)
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        Ok(self.pool.get_connection().map_err(InfraError::from)?)
    }

    /// Ensure the full schema exists on the current database.
    ///
    /// Refuses to touch a database written by a newer schema version.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        create_schema(&conn)?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a trivial query and report pool usage.
    pub fn health_check(&self) -> HealthStatus {
        self.pool.health_check()
    }
}

/// Run `f` with a pooled connection on the blocking thread pool.
pub(crate) async fn with_connection<T, F>(db: &Arc<DbManager>, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
{
    let db = Arc::clone(db);
    task::spawn_blocking(move || -> Result<T> {
        let mut conn = db.get_connection()?;
        f(&mut conn)
    })
    .await
    .map_err(InfraError::from)?
}

fn create_schema(conn: &SqliteConnection) -> Result<()> {
    let found: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(InfraError::from)?;

    if found > SCHEMA_VERSION {
        warn!(found, expected = SCHEMA_VERSION, "database schema is newer than this build");
        let err = StorageError::SchemaVersionMismatch { expected: SCHEMA_VERSION, found };
        return Err(StudySyncError::Database(err.to_string()));
    }

    conn.execute_batch(SCHEMA_SQL).map_err(InfraError::from)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION).map_err(InfraError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn manager(dir: &TempDir) -> DbManager {
        DbManager::new(dir.path().join("test.db"), 4, 1_000).expect("manager created")
    }

    fn user_version(manager: &DbManager) -> i32 {
        manager
            .get_connection()
            .unwrap()
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn migrations_record_user_version() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager = manager(&temp_dir);
        assert_eq!(user_version(&manager), 0);

        manager.run_migrations().expect("migrations run");
        assert_eq!(user_version(&manager), SCHEMA_VERSION);
    }

    #[test]
    fn migrations_are_idempotent_and_create_only_domain_tables() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager = manager(&temp_dir);
        manager.run_migrations().expect("first run");
        manager.run_migrations().expect("second run");

        let conn = manager.get_connection().unwrap();
        let tables = conn
            .query_all(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
                [],
                |row| row.get::<_, String>(0),
            )
            .unwrap();
        assert_eq!(tables, ["chapters", "confidence_ratings", "study_sessions", "theorems"]);
    }

    #[test]
    fn newer_schema_is_refused() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager = manager(&temp_dir);
        manager.run_migrations().unwrap();
        manager.get_connection().unwrap().pragma_update(None, "user_version", 99).unwrap();

        let err = manager.run_migrations().unwrap_err();
        assert!(matches!(err, StudySyncError::Database(msg) if msg.contains("mismatch")));
        assert_eq!(user_version(&manager), 99);
    }

    #[test]
    fn health_check_succeeds_for_valid_database() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager = manager(&temp_dir);
        manager.run_migrations().expect("migrations run");

        assert!(manager.health_check().healthy);
    }
}
