//! # StudySync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories, schema migrations and the catalog seeder
//! - The Google Calendar gateway and its HTTP client
//! - Configuration loading (file + environment)
//!
//! ## Architecture
//! - Implements traits defined in `studysync-core`
//! - Depends on `studysync-common` for the pool and OAuth primitives
//! - Contains all "impure" code (I/O, network)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod seeding;

// Re-export commonly used items
pub use database::{
    DbManager, SqliteCatalogRepository, SqliteConfidenceRepository, SqliteStatsRepository,
    SqliteStudySessionRepository,
};
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::calendar::GoogleCalendarGateway;
pub use seeding::{seed_catalog, SeedOutcome};
