//! First-run data population

pub mod catalog_seeder;

pub use catalog_seeder::{seed_catalog, seed_chapters, SeedOutcome};
