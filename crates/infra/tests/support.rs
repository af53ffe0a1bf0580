#![allow(dead_code)]

use std::sync::Arc;

use rusqlite::params;
use studysync_infra::database::DbManager;
use studysync_infra::seed_catalog;
use tempfile::TempDir;

/// Temporary migrated and seeded database that lives as long as the value.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Migrated store with the shipped syllabus.
    pub fn seeded() -> Self {
        let db = Self::migrated();
        seed_catalog(&db.manager).expect("catalog should seed");
        db
    }

    /// Migrated store with no rows.
    pub fn migrated() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager = DbManager::new(temp_dir.path().join("studysync-test.db"), 4, 2_000)
            .expect("db manager should be created");
        manager.run_migrations().expect("migrations should apply");
        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self.manager.get_connection().expect("connection for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    /// Database id of the chapter with the given syllabus number.
    pub fn chapter_id(&self, number: u8) -> i64 {
        let conn = self.manager.get_connection().expect("connection");
        conn.query_row("SELECT id FROM chapters WHERE number = ?1", params![number], |row| {
            row.get(0)
        })
        .expect("chapter should exist")
    }

    /// Database id of the theorem with the given name.
    pub fn theorem_id(&self, name: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection");
        conn.query_row("SELECT id FROM theorems WHERE name = ?1", params![name], |row| row.get(0))
            .expect("theorem should exist")
    }

    pub fn count(&self, table: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count query")
    }
}
