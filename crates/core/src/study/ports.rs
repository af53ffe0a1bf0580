//! Port interfaces for the study store
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studysync_domain::{
    Chapter, ChapterId, ChapterStats, ConfidenceRating, ConfidenceScore, ImportSummary,
    NewStudySession, OverallStats, Result, StudyExport, StudySession, Theorem, TheoremId,
    TheoremSearchHit,
};

/// Read access to the seeded syllabus
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All chapters ordered by number
    async fn list_chapters(&self) -> Result<Vec<Chapter>>;

    async fn get_chapter(&self, chapter_id: ChapterId) -> Result<Option<Chapter>>;

    /// Theorems of one chapter ordered by `order_index`
    async fn list_theorems(&self, chapter_id: ChapterId) -> Result<Vec<Theorem>>;

    async fn get_theorem(&self, theorem_id: TheoremId) -> Result<Option<Theorem>>;

    /// Case-insensitive substring match on theorem name and statement
    async fn search_theorems(&self, query: &str, limit: usize) -> Result<Vec<TheoremSearchHit>>;
}

/// Confidence ratings, one row per theorem
#[async_trait]
pub trait ConfidenceRepository: Send + Sync {
    /// Insert or overwrite the rating for a theorem.
    ///
    /// Fails with `Validation` when `score` is outside `[0, 10]` or the
    /// theorem does not exist; the prior rating is left untouched.
    async fn upsert_confidence(
        &self,
        theorem_id: TheoremId,
        score: i64,
        rated_at: DateTime<Utc>,
    ) -> Result<ConfidenceRating>;

    async fn get_confidence(&self, theorem_id: TheoremId) -> Result<Option<ConfidenceRating>>;

    async fn list_confidence_for_chapter(
        &self,
        chapter_id: ChapterId,
    ) -> Result<Vec<ConfidenceRating>>;

    /// Upsert the rating and insert the review session in one transaction.
    async fn record_rating_with_review(
        &self,
        theorem_id: TheoremId,
        score: ConfidenceScore,
        rated_at: DateTime<Utc>,
        review: NewStudySession,
    ) -> Result<(ConfidenceRating, StudySession)>;
}

/// Calendar-backed study sessions
#[async_trait]
pub trait StudySessionRepository: Send + Sync {
    async fn create_study_session(&self, session: NewStudySession) -> Result<StudySession>;

    /// The PRIMARY session with the latest `scheduled_at` for a theorem
    async fn latest_primary_session(&self, theorem_id: TheoremId) -> Result<Option<StudySession>>;

    /// Sessions ordered by `scheduled_at`, optionally for one theorem
    async fn list_sessions(&self, theorem_id: Option<TheoremId>) -> Result<Vec<StudySession>>;
}

/// Aggregates and dumps
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn get_stats(&self, chapter_id: ChapterId) -> Result<ChapterStats>;

    /// Syllabus-wide totals; sessions after `now` count as upcoming
    async fn get_overall_stats(&self, now: DateTime<Utc>) -> Result<OverallStats>;

    async fn export_snapshot(&self, exported_at: DateTime<Utc>) -> Result<StudyExport>;

    /// Restore a dump in one transaction.
    ///
    /// Fails with `Validation` and writes nothing when any entry names an
    /// unknown theorem. Sessions whose calendar event is already recorded
    /// are skipped.
    async fn import_snapshot(&self, snapshot: StudyExport) -> Result<ImportSummary>;
}
