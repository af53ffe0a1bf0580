//! Review rule
//!
//! A rating at or below the threshold books one follow-up session a fixed
//! number of days after a reference date. The reference is the theorem's
//! latest primary session when there is one, otherwise the rating itself.

use chrono::Duration;
use studysync_domain::constants::REVIEW_DELAY_DAYS;
use studysync_domain::{ConfidenceRating, ScheduleRequest, SessionKind, StudySession};

/// Decide whether `rating` needs a review session.
///
/// The review inherits the primary session's duration, or
/// `default_duration_minutes` when there is no primary session.
pub fn decide_followup(
    rating: &ConfidenceRating,
    primary_session: Option<&StudySession>,
    default_duration_minutes: u32,
) -> Option<ScheduleRequest> {
    if !rating.score.needs_review() {
        return None;
    }

    let (reference, duration_minutes) = match primary_session {
        Some(primary) => (primary.scheduled_at, primary.duration_minutes),
        None => (rating.updated_at, default_duration_minutes),
    };

    Some(ScheduleRequest {
        theorem_id: rating.theorem_id,
        kind: SessionKind::Review,
        scheduled_at: reference + Duration::days(REVIEW_DELAY_DAYS),
        duration_minutes,
    })
}
