//! Domain types and models

pub mod calendar;
pub mod stats;
pub mod study;

pub use calendar::{AuthorizationRequest, CalendarCredentials, NewCalendarEvent};
pub use stats::{ChapterDetail, ChapterStats, ChapterSummary, OverallStats};
pub use study::{
    Chapter, ChapterId, ConfidenceRating, ConfidenceScore, ImportSummary, NewStudySession,
    ScheduleRequest, SessionId, SessionKind, StudyExport, StudySession, Theorem, TheoremId,
    TheoremSearchHit, TheoremWithConfidence,
};
