//! Study service - confidence ratings and calendar-backed scheduling
//!
//! Every calendar-dependent action calls the provider before touching the
//! store. A failed calendar call therefore leaves no trace, and a rating that
//! books a review is written together with the review in one transaction.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use studysync_domain::constants::{
    MAX_SEARCH_RESULTS, MAX_SESSION_MINUTES, MIN_SEARCH_QUERY_LEN, MIN_SESSION_MINUTES,
};
use studysync_domain::{
    CalendarCredentials, ChapterDetail, ChapterId, ChapterSummary, ConfidenceRating,
    ConfidenceScore, ImportSummary, NewCalendarEvent, OverallStats, Result, ScheduleRequest,
    SessionKind, StudyConfig, StudyExport, StudySession, StudySyncError, Theorem, TheoremId,
    TheoremSearchHit, TheoremWithConfidence,
};
use tracing::{debug, info, instrument, warn};

use super::ports::{CatalogRepository, ConfidenceRepository, StatsRepository, StudySessionRepository};
use super::review::decide_followup;
use crate::calendar_ports::CalendarGateway;

/// Scheduling preferences the service needs from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySettings {
    pub default_session_minutes: u32,
    /// IANA zone sent to the calendar with every event
    pub time_zone: String,
}

impl From<&StudyConfig> for StudySettings {
    fn from(config: &StudyConfig) -> Self {
        Self {
            default_session_minutes: config.default_session_minutes,
            time_zone: config.time_zone.clone(),
        }
    }
}

/// Result of rating a theorem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingOutcome {
    pub rating: ConfidenceRating,
    /// Present when the score triggered a review booking
    pub review: Option<StudySession>,
}

/// Orchestrates the store, the review rule and the calendar gateway
pub struct StudyService {
    catalog: Arc<dyn CatalogRepository>,
    confidence: Arc<dyn ConfidenceRepository>,
    sessions: Arc<dyn StudySessionRepository>,
    stats: Arc<dyn StatsRepository>,
    calendar: Arc<dyn CalendarGateway>,
    settings: StudySettings,
}

impl StudyService {
    /// Create a new study service
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        confidence: Arc<dyn ConfidenceRepository>,
        sessions: Arc<dyn StudySessionRepository>,
        stats: Arc<dyn StatsRepository>,
        calendar: Arc<dyn CalendarGateway>,
        settings: StudySettings,
    ) -> Self {
        Self { catalog, confidence, sessions, stats, calendar, settings }
    }

    /// Chapters in syllabus order, each with its progress figures.
    pub async fn chapter_summaries(&self) -> Result<Vec<ChapterSummary>> {
        let chapters = self.catalog.list_chapters().await?;
        let mut summaries = Vec::with_capacity(chapters.len());
        for chapter in chapters {
            let stats = self.stats.get_stats(chapter.id).await?;
            summaries.push(ChapterSummary { chapter, stats });
        }
        Ok(summaries)
    }

    /// One chapter with stats and every theorem's current rating.
    ///
    /// # Errors
    /// `NotFound` for an unknown chapter id.
    pub async fn chapter_detail(&self, chapter_id: ChapterId) -> Result<ChapterDetail> {
        let chapter = self
            .catalog
            .get_chapter(chapter_id)
            .await?
            .ok_or_else(|| StudySyncError::NotFound(format!("chapter {chapter_id}")))?;

        let stats = self.stats.get_stats(chapter_id).await?;
        let mut ratings: HashMap<TheoremId, ConfidenceRating> = self
            .confidence
            .list_confidence_for_chapter(chapter_id)
            .await?
            .into_iter()
            .map(|rating| (rating.theorem_id, rating))
            .collect();

        let theorems = self
            .catalog
            .list_theorems(chapter_id)
            .await?
            .into_iter()
            .map(|theorem| {
                let confidence = ratings.remove(&theorem.id);
                TheoremWithConfidence { theorem, confidence }
            })
            .collect();

        Ok(ChapterDetail { chapter, stats, theorems })
    }

    /// Record a confidence rating, booking a review when the score is low.
    ///
    /// A score at or below the threshold needs usable calendar credentials;
    /// without them nothing is written and `Auth` is returned.
    ///
    /// # Errors
    /// - `Validation` for an out-of-range score or a theorem outside the chapter
    /// - `NotFound` for an unknown chapter or theorem
    /// - `Auth` when a review is due and credentials are missing or expired
    /// - `CalendarApi` when the provider rejects the review event
    #[instrument(skip(self, credentials, now))]
    pub async fn rate_confidence(
        &self,
        chapter_id: ChapterId,
        theorem_id: TheoremId,
        raw_score: i64,
        credentials: Option<&CalendarCredentials>,
        now: DateTime<Utc>,
    ) -> Result<RatingOutcome> {
        let score = ConfidenceScore::new(raw_score)?;
        let theorem = self.theorem_in_chapter(chapter_id, theorem_id).await?;

        let primary = self.sessions.latest_primary_session(theorem_id).await?;
        let provisional = ConfidenceRating { theorem_id, score, updated_at: now };
        let followup =
            decide_followup(&provisional, primary.as_ref(), self.settings.default_session_minutes);

        let request = match followup {
            None => {
                let rating = self.confidence.upsert_confidence(theorem_id, raw_score, now).await?;
                info!(theorem_id, score = %score, "Confidence recorded");
                return Ok(RatingOutcome { rating, review: None });
            }
            Some(request) => request,
        };

        let credentials = usable_credentials(credentials, now)?;
        debug!(
            theorem_id,
            review_at = %request.scheduled_at,
            has_primary = primary.is_some(),
            "Booking review session"
        );

        let event = self.calendar_event(&theorem, &request);
        let event_id = self.calendar.create_event(credentials, &event).await.map_err(|e| {
            warn!(theorem_id, error = %e, "Review event creation failed; rating not saved");
            e
        })?;

        let (rating, review) = self
            .confidence
            .record_rating_with_review(theorem_id, score, now, request.into_new_session(event_id))
            .await?;

        info!(theorem_id, score = %score, review_id = review.id, "Confidence recorded with review");
        Ok(RatingOutcome { rating, review: Some(review) })
    }

    /// Book a primary study session on the calendar and record it.
    ///
    /// # Errors
    /// - `Validation` for a duration outside the allowed range
    /// - `NotFound` for an unknown theorem
    /// - `Auth` when credentials are missing or expired
    /// - `CalendarApi` when the provider rejects the event; nothing is stored
    #[instrument(skip(self, credentials, now))]
    pub async fn schedule_primary(
        &self,
        theorem_id: TheoremId,
        start: DateTime<Utc>,
        duration_minutes: Option<u32>,
        credentials: Option<&CalendarCredentials>,
        now: DateTime<Utc>,
    ) -> Result<StudySession> {
        let duration_minutes = duration_minutes.unwrap_or(self.settings.default_session_minutes);
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&duration_minutes) {
            return Err(StudySyncError::Validation(format!(
                "duration must be between {MIN_SESSION_MINUTES} and {MAX_SESSION_MINUTES} \
                 minutes, got {duration_minutes}"
            )));
        }

        let theorem = self
            .catalog
            .get_theorem(theorem_id)
            .await?
            .ok_or_else(|| StudySyncError::NotFound(format!("theorem {theorem_id}")))?;
        let credentials = usable_credentials(credentials, now)?;

        let request = ScheduleRequest {
            theorem_id,
            kind: SessionKind::Primary,
            scheduled_at: start,
            duration_minutes,
        };

        let event = self.calendar_event(&theorem, &request);
        let event_id = self.calendar.create_event(credentials, &event).await.map_err(|e| {
            warn!(theorem_id, error = %e, "Study event creation failed; session not saved");
            e
        })?;

        let session = self.sessions.create_study_session(request.into_new_session(event_id)).await?;
        info!(theorem_id, session_id = session.id, "Primary session scheduled");
        Ok(session)
    }

    /// Theorems whose name or statement contains `query`, case-insensitively.
    ///
    /// # Errors
    /// `Validation` when the trimmed query is shorter than
    /// [`MIN_SEARCH_QUERY_LEN`] characters.
    pub async fn search(&self, query: &str) -> Result<Vec<TheoremSearchHit>> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Err(StudySyncError::Validation(format!(
                "search query must be at least {MIN_SEARCH_QUERY_LEN} characters"
            )));
        }
        let hits = self.catalog.search_theorems(query, MAX_SEARCH_RESULTS).await?;
        debug!(query, hits = hits.len(), "Theorem search");
        Ok(hits)
    }

    /// Recorded study sessions, optionally for one theorem.
    ///
    /// # Errors
    /// `NotFound` when a theorem filter names an unknown theorem.
    pub async fn sessions(&self, theorem_id: Option<TheoremId>) -> Result<Vec<StudySession>> {
        if let Some(theorem_id) = theorem_id {
            self.catalog
                .get_theorem(theorem_id)
                .await?
                .ok_or_else(|| StudySyncError::NotFound(format!("theorem {theorem_id}")))?;
        }
        self.sessions.list_sessions(theorem_id).await
    }

    /// Totals across the whole syllabus, counting sessions scheduled after
    /// `now` as upcoming.
    pub async fn overall_stats(&self, now: DateTime<Utc>) -> Result<OverallStats> {
        self.stats.get_overall_stats(now).await
    }

    /// Snapshot of every rating and session, stamped with `now`.
    pub async fn export(&self, now: DateTime<Utc>) -> Result<StudyExport> {
        self.stats.export_snapshot(now).await
    }

    /// Restore ratings and sessions from an [`export`](Self::export) dump.
    ///
    /// No calendar events are created; imported sessions keep the event
    /// ids they were exported with.
    ///
    /// # Errors
    /// `Validation` when a session has a duration outside the allowed range
    /// or no calendar event id, or when any entry names an unknown theorem.
    /// Nothing is written in that case.
    #[instrument(skip_all, fields(ratings = snapshot.ratings.len(), sessions = snapshot.sessions.len()))]
    pub async fn import(&self, snapshot: StudyExport) -> Result<ImportSummary> {
        for session in &snapshot.sessions {
            if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&session.duration_minutes) {
                return Err(StudySyncError::Validation(format!(
                    "session {} has a duration of {} minutes",
                    session.id, session.duration_minutes
                )));
            }
            if session.calendar_event_id.trim().is_empty() {
                return Err(StudySyncError::Validation(format!(
                    "session {} has no calendar event id",
                    session.id
                )));
            }
        }

        let summary = self.stats.import_snapshot(snapshot).await?;
        info!(
            ratings = summary.ratings,
            sessions = summary.sessions,
            skipped = summary.skipped_sessions,
            "Snapshot imported"
        );
        Ok(summary)
    }

    async fn theorem_in_chapter(
        &self,
        chapter_id: ChapterId,
        theorem_id: TheoremId,
    ) -> Result<Theorem> {
        if self.catalog.get_chapter(chapter_id).await?.is_none() {
            return Err(StudySyncError::NotFound(format!("chapter {chapter_id}")));
        }

        let theorem = self
            .catalog
            .get_theorem(theorem_id)
            .await?
            .ok_or_else(|| StudySyncError::NotFound(format!("theorem {theorem_id}")))?;

        if theorem.chapter_id != chapter_id {
            return Err(StudySyncError::Validation(format!(
                "theorem {theorem_id} does not belong to chapter {chapter_id}"
            )));
        }
        Ok(theorem)
    }

    fn calendar_event(&self, theorem: &Theorem, request: &ScheduleRequest) -> NewCalendarEvent {
        let prefix = match request.kind {
            SessionKind::Primary => "Study",
            SessionKind::Review => "Review",
        };

        NewCalendarEvent {
            title: format!("{prefix}: {}", theorem.name),
            description: Some(theorem.statement.clone()),
            start: request.scheduled_at,
            end: request.ends_at(),
            time_zone: self.settings.time_zone.clone(),
        }
    }
}

fn usable_credentials(
    credentials: Option<&CalendarCredentials>,
    now: DateTime<Utc>,
) -> Result<&CalendarCredentials> {
    match credentials {
        Some(credentials) if !credentials.is_expired_at(now) => Ok(credentials),
        Some(_) => Err(StudySyncError::Auth("calendar authorization expired".to_string())),
        None => Err(StudySyncError::Auth("calendar authorization required".to_string())),
    }
}
