//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Confidence scale
pub const MIN_CONFIDENCE_SCORE: i64 = 0;
pub const MAX_CONFIDENCE_SCORE: i64 = 10;

// Review rule: a rating at or below the threshold schedules a review
pub const REVIEW_THRESHOLD: u8 = 3;
pub const REVIEW_DELAY_DAYS: i64 = 3;

// Study session length bounds (minutes)
pub const DEFAULT_SESSION_MINUTES: u32 = 60;
pub const MIN_SESSION_MINUTES: u32 = 5;
pub const MAX_SESSION_MINUTES: u32 = 480;

// Syllabus shape
pub const CHAPTER_COUNT: usize = 14;

// Search
pub const MAX_SEARCH_RESULTS: usize = 50;
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

// Session cookie
pub const SESSION_COOKIE_NAME: &str = "studysync_session";
pub const MIN_SECRET_KEY_BYTES: usize = 32;

// Session lifetime (minutes)
pub const MIN_SESSION_TTL_MINUTES: i64 = 1;
pub const MAX_SESSION_TTL_MINUTES: i64 = 7 * 24 * 60;
