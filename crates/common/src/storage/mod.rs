//! Storage primitives for SQLite databases
//!
//! Provides an r2d2-backed connection pool with per-connection pragmas, a
//! thin connection wrapper and the storage error type. Schema and queries
//! belong to the application layer.

pub mod error;
pub mod sqlite;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use sqlite::{apply_connection_pragmas, SqliteConnection, SqlitePool, SqlitePoolConfig};
pub use types::HealthStatus;
