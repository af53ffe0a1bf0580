//! # StudySync Domain
//!
//! Business domain types and models for StudySync.
//!
//! This crate contains:
//! - Domain data types (Chapter, Theorem, ConfidenceRating, StudySession)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - The static syllabus catalog and domain constants
//!
//! ## Architecture
//! - No dependencies on other StudySync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod catalog;
pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
