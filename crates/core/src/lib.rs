//! # StudySync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the store and the calendar
//! - The review rule
//! - The `StudyService` use cases
//!
//! ## Architecture Principles
//! - Only depends on `studysync-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod calendar_ports;
pub mod study;

pub use calendar_ports::CalendarGateway;
pub use study::ports::{
    CatalogRepository, ConfidenceRepository, StatsRepository, StudySessionRepository,
};
pub use study::review::decide_followup;
pub use study::service::{RatingOutcome, StudyService, StudySettings};
