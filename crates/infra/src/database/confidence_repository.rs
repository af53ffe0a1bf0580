//! SQLite-backed implementation of the `ConfidenceRepository` port.
//!
//! One row per theorem; a new rating overwrites the previous one. Rejected
//! writes (bad score, unknown theorem) are detected before any statement
//! runs, so the stored rating is never touched by a failed call.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;
use studysync_core::ConfidenceRepository;
use studysync_domain::{
    ChapterId, ConfidenceRating, ConfidenceScore, NewStudySession, Result as DomainResult,
    StudySession, StudySyncError, TheoremId,
};
use tracing::{debug, instrument};

use super::manager::{with_connection, DbManager};
use super::rows::{insert_session, map_rating, theorem_exists, upsert_rating, RATING_COLUMNS};
use crate::errors::InfraError;

/// SQLite-backed confidence ratings.
pub struct SqliteConfidenceRepository {
    db: Arc<DbManager>,
}

impl SqliteConfidenceRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

fn unknown_theorem(theorem_id: TheoremId) -> StudySyncError {
    StudySyncError::Validation(format!("theorem {theorem_id} does not exist"))
}

#[async_trait]
impl ConfidenceRepository for SqliteConfidenceRepository {
    #[instrument(skip(self, rated_at))]
    async fn upsert_confidence(
        &self,
        theorem_id: TheoremId,
        score: i64,
        rated_at: DateTime<Utc>,
    ) -> DomainResult<ConfidenceRating> {
        let score = ConfidenceScore::new(score)?;

        with_connection(&self.db, move |conn| {
            if !theorem_exists(conn, theorem_id).map_err(InfraError::from)? {
                return Err(unknown_theorem(theorem_id));
            }
            let rating =
                upsert_rating(conn, theorem_id, score, rated_at).map_err(InfraError::from)?;
            debug!(theorem_id, score = %score, "rating stored");
            Ok(rating)
        })
        .await
    }

    async fn get_confidence(&self, theorem_id: TheoremId) -> DomainResult<Option<ConfidenceRating>> {
        with_connection(&self.db, move |conn| {
            let sql = format!(
                "SELECT {RATING_COLUMNS} FROM confidence_ratings c WHERE c.theorem_id = ?1"
            );
            Ok(conn.query_optional(&sql, params![theorem_id], map_rating).map_err(InfraError::from)?)
        })
        .await
    }

    async fn list_confidence_for_chapter(
        &self,
        chapter_id: ChapterId,
    ) -> DomainResult<Vec<ConfidenceRating>> {
        with_connection(&self.db, move |conn| {
            let sql = format!(
                "SELECT {RATING_COLUMNS}
                 FROM confidence_ratings c
                 JOIN theorems t ON t.id = c.theorem_id
                 WHERE t.chapter_id = ?1
                 ORDER BY t.order_index"
            );
            Ok(conn.query_all(&sql, params![chapter_id], map_rating).map_err(InfraError::from)?)
        })
        .await
    }

    #[instrument(skip(self, rated_at, review), fields(review_at = %review.scheduled_at))]
    async fn record_rating_with_review(
        &self,
        theorem_id: TheoremId,
        score: ConfidenceScore,
        rated_at: DateTime<Utc>,
        review: NewStudySession,
    ) -> DomainResult<(ConfidenceRating, StudySession)> {
        with_connection(&self.db, move |conn| {
            let tx = conn.transaction().map_err(InfraError::from)?;
            if !theorem_exists(&tx, theorem_id).map_err(InfraError::from)? {
                return Err(unknown_theorem(theorem_id));
            }

            let rating = upsert_rating(&tx, theorem_id, score, rated_at).map_err(InfraError::from)?;
            let session = insert_session(&tx, &review, Utc::now()).map_err(InfraError::from)?;
            tx.commit().map_err(InfraError::from)?;

            debug!(theorem_id, session_id = session.id, "rating and review committed");
            Ok((rating, session))
        })
        .await
    }
}
