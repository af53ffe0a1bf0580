//! Statistics types
//!
//! Per-chapter progress figures for the chapter listing, and syllabus-wide
//! totals for the stats page.

use serde::{Deserialize, Serialize};

use super::study::{Chapter, ChapterId, TheoremWithConfidence};

/* -------------------------------------------------------------------------- */
/* Chapter Statistics */
/* -------------------------------------------------------------------------- */

/// Progress figures for a single chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterStats {
    pub chapter_id: ChapterId,

    /// Number of theorems in the chapter
    pub theorem_count: u32,

    /// Number of theorems with a confidence rating
    pub rated_count: u32,

    /// Mean score over rated theorems; `None` until something is rated
    pub average_confidence: Option<f64>,
}

/// Chapter row together with its stats, as listed on the index route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterSummary {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub stats: ChapterStats,
}

/// Everything the chapter page shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterDetail {
    pub chapter: Chapter,
    pub stats: ChapterStats,
    pub theorems: Vec<TheoremWithConfidence>,
}

/* -------------------------------------------------------------------------- */
/* Syllabus Statistics */
/* -------------------------------------------------------------------------- */

/// Totals across the whole syllabus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub chapter_count: u32,
    pub theorem_count: u32,
    pub rated_count: u32,
    pub average_confidence: Option<f64>,

    /// Rated theorems at or below the review threshold
    pub low_confidence_count: u32,

    pub primary_sessions: u32,
    pub review_sessions: u32,

    /// Sessions whose start is still in the future
    pub upcoming_sessions: u32,
}
