//! SQLite-backed implementation of the `StudySessionRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use studysync_core::StudySessionRepository;
use studysync_domain::{
    NewStudySession, Result as DomainResult, SessionKind, StudySession, TheoremId,
};
use tracing::instrument;

use super::manager::{with_connection, DbManager};
use super::rows::{insert_session, map_session, SESSION_COLUMNS};
use crate::errors::InfraError;

/// SQLite-backed study sessions.
pub struct SqliteStudySessionRepository {
    db: Arc<DbManager>,
}

impl SqliteStudySessionRepository {
    /// Create a new repository backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudySessionRepository for SqliteStudySessionRepository {
    #[instrument(skip(self, session), fields(theorem_id = session.theorem_id, kind = %session.kind))]
    async fn create_study_session(&self, session: NewStudySession) -> DomainResult<StudySession> {
        with_connection(&self.db, move |conn| {
            Ok(insert_session(conn, &session, Utc::now()).map_err(InfraError::from)?)
        })
        .await
    }

    async fn latest_primary_session(
        &self,
        theorem_id: TheoremId,
    ) -> DomainResult<Option<StudySession>> {
        with_connection(&self.db, move |conn| {
            let sql = format!(
                "SELECT {SESSION_COLUMNS} FROM study_sessions
                 WHERE theorem_id = ?1 AND kind = ?2
                 ORDER BY scheduled_at DESC, id DESC
                 LIMIT 1"
            );
            let session = conn
                .query_optional(&sql, params![theorem_id, SessionKind::Primary.as_str()], map_session)
                .map_err(InfraError::from)?;
            Ok(session)
        })
        .await
    }

    async fn list_sessions(&self, theorem_id: Option<TheoremId>) -> DomainResult<Vec<StudySession>> {
        with_connection(&self.db, move |conn| {
            let sql = format!(
                "SELECT {SESSION_COLUMNS} FROM study_sessions
                 WHERE ?1 IS NULL OR theorem_id = ?1
                 ORDER BY scheduled_at, id"
            );
            Ok(conn.query_all(&sql, params![theorem_id], map_session).map_err(InfraError::from)?)
        })
        .await
    }
}
