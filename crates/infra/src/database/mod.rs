//! Database implementations

pub mod catalog_repository;
pub mod confidence_repository;
pub mod manager;
mod rows;
pub mod session_repository;
pub mod stats_repository;

pub use catalog_repository::SqliteCatalogRepository;
pub use confidence_repository::SqliteConfidenceRepository;
pub use manager::{DbManager, SCHEMA_VERSION};
pub use session_repository::SqliteStudySessionRepository;
pub use stats_repository::SqliteStatsRepository;
