//! Parsing of user-supplied start times

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use studysync_domain::{Result, StudySyncError};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Parse an RFC 3339 instant, or a naive local time in `tz`.
///
/// A local time that falls in a daylight-saving gap is rejected; one that
/// occurs twice resolves to the earlier instant.
///
/// # Errors
/// `Validation` when the text matches no accepted format.
pub fn parse_start(raw: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| {
            StudySyncError::Validation(format!(
                "invalid start {raw:?}: expected RFC 3339 or YYYY-MM-DDTHH:MM[:SS]"
            ))
        })?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => {
            Ok(local.with_timezone(&Utc))
        }
        LocalResult::None => Err(StudySyncError::Validation(format!(
            "start {raw:?} does not exist in time zone {tz}"
        ))),
    }
}
