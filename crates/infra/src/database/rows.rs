//! Row mapping and statements shared by the SQLite repositories.
//!
//! Helpers take a plain `rusqlite::Connection` so they run unchanged on a
//! pooled connection or inside a transaction.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use studysync_domain::{
    Chapter, ConfidenceRating, ConfidenceScore, NewStudySession, SessionKind, StudySession,
    Theorem, TheoremId,
};

pub(crate) const CHAPTER_COLUMNS: &str = "id, number, title";
pub(crate) const THEOREM_COLUMNS: &str = "t.id, t.chapter_id, t.name, t.statement, t.order_index";
pub(crate) const RATING_COLUMNS: &str = "c.theorem_id, c.score, c.updated_at";
pub(crate) const SESSION_COLUMNS: &str =
    "id, theorem_id, scheduled_at, duration_minutes, calendar_event_id, kind, created_at";

pub(crate) fn from_unix(column: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(column, secs))
}

/// Drop sub-second precision so returned values match what is stored.
pub(crate) fn truncate_to_second(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at)
}

pub(crate) fn map_chapter(row: &Row<'_>) -> rusqlite::Result<Chapter> {
    Ok(Chapter { id: row.get(0)?, number: row.get(1)?, title: row.get(2)? })
}

pub(crate) fn map_theorem(row: &Row<'_>) -> rusqlite::Result<Theorem> {
    Ok(Theorem {
        id: row.get(0)?,
        chapter_id: row.get(1)?,
        name: row.get(2)?,
        statement: row.get(3)?,
        order_index: row.get(4)?,
    })
}

/// Map a rating whose columns start at `offset`.
pub(crate) fn map_rating_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<ConfidenceRating> {
    let raw: i64 = row.get(offset + 1)?;
    let score = ConfidenceScore::new(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(offset + 1, Type::Integer, Box::new(e))
    })?;

    Ok(ConfidenceRating {
        theorem_id: row.get(offset)?,
        score,
        updated_at: from_unix(offset + 2, row.get(offset + 2)?)?,
    })
}

pub(crate) fn map_rating(row: &Row<'_>) -> rusqlite::Result<ConfidenceRating> {
    map_rating_at(row, 0)
}

pub(crate) fn map_session(row: &Row<'_>) -> rusqlite::Result<StudySession> {
    let kind_text: String = row.get(5)?;
    let kind = kind_text
        .parse::<SessionKind>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(StudySession {
        id: row.get(0)?,
        theorem_id: row.get(1)?,
        scheduled_at: from_unix(2, row.get(2)?)?,
        duration_minutes: row.get(3)?,
        calendar_event_id: row.get(4)?,
        kind,
        created_at: from_unix(6, row.get(6)?)?,
    })
}

pub(crate) fn theorem_exists(conn: &Connection, theorem_id: TheoremId) -> rusqlite::Result<bool> {
    conn.query_row("SELECT 1 FROM theorems WHERE id = ?1", params![theorem_id], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
}

pub(crate) fn session_event_recorded(
    conn: &Connection,
    calendar_event_id: &str,
) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM study_sessions WHERE calendar_event_id = ?1",
        params![calendar_event_id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

pub(crate) fn upsert_rating(
    conn: &Connection,
    theorem_id: TheoremId,
    score: ConfidenceScore,
    rated_at: DateTime<Utc>,
) -> rusqlite::Result<ConfidenceRating> {
    conn.execute(
        "INSERT INTO confidence_ratings (theorem_id, score, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(theorem_id) DO UPDATE SET
            score = excluded.score,
            updated_at = excluded.updated_at",
        params![theorem_id, score.value(), rated_at.timestamp()],
    )?;

    Ok(ConfidenceRating { theorem_id, score, updated_at: truncate_to_second(rated_at) })
}

pub(crate) fn insert_session(
    conn: &Connection,
    session: &NewStudySession,
    created_at: DateTime<Utc>,
) -> rusqlite::Result<StudySession> {
    conn.execute(
        "INSERT INTO study_sessions
            (theorem_id, scheduled_at, duration_minutes, calendar_event_id, kind, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            session.theorem_id,
            session.scheduled_at.timestamp(),
            session.duration_minutes,
            session.calendar_event_id,
            session.kind.as_str(),
            created_at.timestamp(),
        ],
    )?;

    Ok(StudySession {
        id: conn.last_insert_rowid(),
        theorem_id: session.theorem_id,
        scheduled_at: truncate_to_second(session.scheduled_at),
        duration_minutes: session.duration_minutes,
        calendar_event_id: session.calendar_event_id.clone(),
        kind: session.kind,
        created_at: truncate_to_second(created_at),
    })
}
