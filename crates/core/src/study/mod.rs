//! Confidence tracking and study-session scheduling

pub mod ports;
pub mod review;
pub mod service;

pub use review::decide_followup;
pub use service::{RatingOutcome, StudyService, StudySettings};
