//! SQLite-backed implementation of the `StatsRepository` port.
//!
//! Aggregates are computed in SQL on every call; the data set is small.
//! Import is the inverse of export and runs as a single transaction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;
use studysync_core::StatsRepository;
use studysync_domain::constants::REVIEW_THRESHOLD;
use studysync_domain::{
    ChapterId, ChapterStats, ImportSummary, NewStudySession, OverallStats, Result as DomainResult,
    SessionKind, StudyExport, StudySyncError,
};
use tracing::{debug, info, instrument};

use super::manager::{with_connection, DbManager};
use super::rows::{
    insert_session, map_rating, map_session, session_event_recorded, theorem_exists,
    upsert_rating, RATING_COLUMNS, SESSION_COLUMNS,
};
use crate::errors::InfraError;

/// SQLite-backed statistics and export.
pub struct SqliteStatsRepository {
    db: Arc<DbManager>,
}

impl SqliteStatsRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsRepository for SqliteStatsRepository {
    async fn get_stats(&self, chapter_id: ChapterId) -> DomainResult<ChapterStats> {
        with_connection(&self.db, move |conn| {
            let stats = conn
                .query_row(
                    "SELECT COUNT(t.id), COUNT(c.theorem_id), AVG(c.score)
                     FROM theorems t
                     LEFT JOIN confidence_ratings c ON c.theorem_id = t.id
                     WHERE t.chapter_id = ?1",
                    params![chapter_id],
                    |row| {
                        Ok(ChapterStats {
                            chapter_id,
                            theorem_count: row.get(0)?,
                            rated_count: row.get(1)?,
                            average_confidence: row.get(2)?,
                        })
                    },
                )
                .map_err(InfraError::from)?;
            Ok(stats)
        })
        .await
    }

    async fn get_overall_stats(&self, now: DateTime<Utc>) -> DomainResult<OverallStats> {
        with_connection(&self.db, move |conn| {
            let stats = conn
                .query_row(
                    "SELECT
                        (SELECT COUNT(*) FROM chapters),
                        (SELECT COUNT(*) FROM theorems),
                        (SELECT COUNT(*) FROM confidence_ratings),
                        (SELECT AVG(score) FROM confidence_ratings),
                        (SELECT COUNT(*) FROM confidence_ratings WHERE score <= ?1),
                        (SELECT COUNT(*) FROM study_sessions WHERE kind = ?2),
                        (SELECT COUNT(*) FROM study_sessions WHERE kind = ?3),
                        (SELECT COUNT(*) FROM study_sessions WHERE scheduled_at > ?4)",
                    params![
                        REVIEW_THRESHOLD,
                        SessionKind::Primary.as_str(),
                        SessionKind::Review.as_str(),
                        now.timestamp(),
                    ],
                    |row| {
                        Ok(OverallStats {
                            chapter_count: row.get(0)?,
                            theorem_count: row.get(1)?,
                            rated_count: row.get(2)?,
                            average_confidence: row.get(3)?,
                            low_confidence_count: row.get(4)?,
                            primary_sessions: row.get(5)?,
                            review_sessions: row.get(6)?,
                            upcoming_sessions: row.get(7)?,
                        })
                    },
                )
                .map_err(InfraError::from)?;
            Ok(stats)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn export_snapshot(&self, exported_at: DateTime<Utc>) -> DomainResult<StudyExport> {
        with_connection(&self.db, move |conn| {
            let ratings_sql = format!(
                "SELECT {RATING_COLUMNS} FROM confidence_ratings c ORDER BY c.theorem_id"
            );
            let sessions_sql =
                format!("SELECT {SESSION_COLUMNS} FROM study_sessions ORDER BY scheduled_at, id");

            let ratings = conn.query_all(&ratings_sql, [], map_rating).map_err(InfraError::from)?;
            let sessions =
                conn.query_all(&sessions_sql, [], map_session).map_err(InfraError::from)?;

            info!(ratings = ratings.len(), sessions = sessions.len(), "export assembled");
            Ok(StudyExport { exported_at, ratings, sessions })
        })
        .await
    }
    #[instrument(skip_all, fields(ratings = snapshot.ratings.len(), sessions = snapshot.sessions.len()))]
    async fn import_snapshot(&self, snapshot: StudyExport) -> DomainResult<ImportSummary> {
        with_connection(&self.db, move |conn| {
            let tx = conn.transaction().map_err(InfraError::from)?;

            let referenced = snapshot
                .ratings
                .iter()
                .map(|rating| rating.theorem_id)
                .chain(snapshot.sessions.iter().map(|session| session.theorem_id));
            for theorem_id in referenced {
                if !theorem_exists(&tx, theorem_id).map_err(InfraError::from)? {
                    return Err(StudySyncError::Validation(format!(
                        "import references unknown theorem {theorem_id}"
                    )));
                }
            }

            let mut summary = ImportSummary::default();
            for rating in &snapshot.ratings {
                upsert_rating(&tx, rating.theorem_id, rating.score, rating.updated_at)
                    .map_err(InfraError::from)?;
                summary.ratings += 1;
            }

            for session in snapshot.sessions {
                if session_event_recorded(&tx, &session.calendar_event_id)
                    .map_err(InfraError::from)?
                {
                    debug!(event_id = %session.calendar_event_id, "session already recorded");
                    summary.skipped_sessions += 1;
                    continue;
                }
                let created_at = session.created_at;
                let new_session = NewStudySession {
                    theorem_id: session.theorem_id,
                    scheduled_at: session.scheduled_at,
                    duration_minutes: session.duration_minutes,
                    kind: session.kind,
                    calendar_event_id: session.calendar_event_id,
                };
                insert_session(&tx, &new_session, created_at).map_err(InfraError::from)?;
                summary.sessions += 1;
            }

            tx.commit().map_err(InfraError::from)?;
            info!(
                ratings = summary.ratings,
                sessions = summary.sessions,
                skipped = summary.skipped_sessions,
                "snapshot imported"
            );
            Ok(summary)
        })
        .await
    }
}
