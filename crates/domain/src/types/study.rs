//! Syllabus, confidence and study-session types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_CONFIDENCE_SCORE, MIN_CONFIDENCE_SCORE, REVIEW_THRESHOLD};
use crate::errors::{Result, StudySyncError};

pub type ChapterId = i64;
pub type TheoremId = i64;
pub type SessionId = i64;

/// One of the fixed syllabus units. Immutable after seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub number: u8,
    pub title: String,
}

/// A trackable theorem or proof within a chapter. Immutable after seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theorem {
    pub id: TheoremId,
    pub chapter_id: ChapterId,
    pub name: String,
    pub statement: String,
    pub order_index: u32,
}

/// Self-assessed understanding on the 0–10 scale.
///
/// Construction goes through [`ConfidenceScore::new`] so an out-of-range
/// value can never reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ConfidenceScore(u8);

impl ConfidenceScore {
    /// Validate a raw score.
    ///
    /// # Errors
    /// Returns `StudySyncError::Validation` when `raw` is outside `[0, 10]`.
    pub fn new(raw: i64) -> Result<Self> {
        u8::try_from(raw)
            .ok()
            .filter(|_| (MIN_CONFIDENCE_SCORE..=MAX_CONFIDENCE_SCORE).contains(&raw))
            .map(Self)
            .ok_or_else(|| {
                StudySyncError::Validation(format!(
                    "confidence score must be between {MIN_CONFIDENCE_SCORE} and \
                     {MAX_CONFIDENCE_SCORE}, got {raw}"
                ))
            })
    }

    /// The score as a plain integer in `0..=10`.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this score triggers an automatic review session.
    pub fn needs_review(self) -> bool {
        self.0 <= REVIEW_THRESHOLD
    }
}

impl<'de> Deserialize<'de> for ConfidenceScore {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Latest confidence rating for a theorem (one row per theorem).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceRating {
    pub theorem_id: TheoremId,
    pub score: ConfidenceScore,
    pub updated_at: DateTime<Utc>,
}

/// Whether a session was booked by the user or created by the review rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionKind {
    Primary,
    Review,
}

impl SessionKind {
    /// Stored and serialized spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Review => "REVIEW",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = StudySyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PRIMARY" => Ok(Self::Primary),
            "REVIEW" => Ok(Self::Review),
            other => Err(StudySyncError::Database(format!("unknown session kind: {other}"))),
        }
    }
}

/// A calendar-backed study block tied to a theorem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: SessionId,
    pub theorem_id: TheoremId,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub calendar_event_id: String,
    pub kind: SessionKind,
    pub created_at: DateTime<Utc>,
}

impl StudySession {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_at + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// Insert parameters for a study session whose calendar event already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudySession {
    pub theorem_id: TheoremId,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub kind: SessionKind,
    pub calendar_event_id: String,
}

/// A session that should be booked on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub theorem_id: TheoremId,
    pub kind: SessionKind,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
}

impl ScheduleRequest {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Attach the calendar event id returned by the provider.
    pub fn into_new_session(self, calendar_event_id: String) -> NewStudySession {
        NewStudySession {
            theorem_id: self.theorem_id,
            scheduled_at: self.scheduled_at,
            duration_minutes: self.duration_minutes,
            kind: self.kind,
            calendar_event_id,
        }
    }
}

/// Theorem row joined with its current rating, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoremWithConfidence {
    #[serde(flatten)]
    pub theorem: Theorem,
    pub confidence: Option<ConfidenceRating>,
}

/// Search result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoremSearchHit {
    pub theorem: Theorem,
    pub chapter_number: u8,
    pub chapter_title: String,
}

/// Full dump of user-generated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyExport {
    pub exported_at: DateTime<Utc>,
    pub ratings: Vec<ConfidenceRating>,
    pub sessions: Vec<StudySession>,
}

/// Counts written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub ratings: usize,
    pub sessions: usize,
    /// Sessions whose calendar event was already recorded
    pub skipped_sessions: usize,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn confidence_score_accepts_full_range() {
        for raw in 0..=10 {
            let score = ConfidenceScore::new(raw).expect("in range");
            assert_eq!(i64::from(score.value()), raw);
        }
    }

    #[test]
    fn confidence_score_rejects_out_of_range() {
        for raw in [-1, 11, 100, i64::MIN] {
            assert!(matches!(ConfidenceScore::new(raw), Err(StudySyncError::Validation(_))));
        }
    }

    #[test]
    fn review_threshold_is_inclusive() {
        assert!(ConfidenceScore::new(3).unwrap().needs_review());
        assert!(ConfidenceScore::new(0).unwrap().needs_review());
        assert!(!ConfidenceScore::new(4).unwrap().needs_review());
    }

    #[test]
    fn deserializing_score_validates_range() {
        assert!(serde_json::from_str::<ConfidenceScore>("7").is_ok());
        assert!(serde_json::from_str::<ConfidenceScore>("11").is_err());
    }

    #[test]
    fn session_kind_round_trips_through_db_text() {
        assert_eq!("PRIMARY".parse::<SessionKind>().unwrap(), SessionKind::Primary);
        assert_eq!(SessionKind::Review.as_str(), "REVIEW");
        assert!("weekly".parse::<SessionKind>().is_err());
    }

    #[test]
    fn schedule_request_end_uses_duration() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap();
        let request = ScheduleRequest {
            theorem_id: 1,
            kind: SessionKind::Primary,
            scheduled_at: start,
            duration_minutes: 90,
        };
        assert_eq!(request.ends_at(), Utc.with_ymd_and_hms(2024, 1, 10, 11, 30, 0).unwrap());
    }
}
