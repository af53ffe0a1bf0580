//! Integration tests for the SQLite storage primitives

#![cfg(feature = "platform")]

use std::time::Duration;

use rusqlite::params;
use studysync_common::storage::{SqlitePool, SqlitePoolConfig, StorageError};
use tempfile::TempDir;

fn pool(dir: &TempDir) -> SqlitePool {
    SqlitePool::new(&dir.path().join("store.db"), SqlitePoolConfig::new(4, 2_000))
        .expect("pool opens")
}

#[test]
fn test_foreign_keys_enforced_on_every_pooled_connection() {
    let dir = TempDir::new().unwrap();
    let pool = pool(&dir);

    pool.get_connection()
        .unwrap()
        .execute_batch(
            "CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (id INTEGER PRIMARY KEY,
                                 parent_id INTEGER NOT NULL REFERENCES parent(id));",
        )
        .unwrap();

    // Hold one connection so the next comes from a fresh slot
    let _held = pool.get_connection().unwrap();
    let conn = pool.get_connection().unwrap();

    let err = conn.execute("INSERT INTO child (parent_id) VALUES (?1)", params![99]).unwrap_err();
    assert!(err.is_constraint_violation(), "{err}");
}

#[test]
fn test_committed_transaction_visible_to_other_connections() {
    let dir = TempDir::new().unwrap();
    let pool = pool(&dir);

    let mut writer = pool.get_connection().unwrap();
    writer.execute("CREATE TABLE notes (body TEXT NOT NULL)", []).unwrap();

    let tx = writer.transaction().unwrap();
    tx.execute("INSERT INTO notes (body) VALUES ('a')", []).unwrap();
    tx.execute("INSERT INTO notes (body) VALUES ('b')", []).unwrap();
    tx.commit().unwrap();

    let reader = pool.get_connection().unwrap();
    let count: i64 = reader.query_row("SELECT COUNT(*) FROM notes", [], |r| r.get(0)).unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_pool_reopens_existing_file() {
    let dir = TempDir::new().unwrap();

    {
        let conn = pool(&dir).get_connection().unwrap();
        conn.execute("CREATE TABLE kept (v INTEGER)", []).unwrap();
        conn.execute("INSERT INTO kept (v) VALUES (7)", []).unwrap();
    }

    let conn = pool(&dir).get_connection().unwrap();
    let v: i64 = conn.query_row("SELECT v FROM kept", [], |r| r.get(0)).unwrap();
    assert_eq!(v, 7);
}

#[test]
fn test_missing_directory_fails_with_connection_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no-such-dir").join("store.db");

    let config = SqlitePoolConfig {
        connection_timeout: Duration::from_millis(300),
        ..SqlitePoolConfig::default()
    };

    let result = SqlitePool::new(&path, config);
    assert!(matches!(result, Err(StorageError::Connection(_))));
}
