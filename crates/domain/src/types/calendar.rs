//! Calendar integration types shared between core ports and the adapter.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth credentials for the calendar provider.
///
/// Held only in per-session memory; never written to the store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCredentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
}

impl CalendarCredentials {
    /// Whether the access token is unusable at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

impl fmt::Debug for CalendarCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarCredentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Consent-screen redirect plus the values that must survive until the
/// callback arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
    pub pkce_verifier: String,
}

/// Event to create on the user's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCalendarEvent {
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA zone the provider should display the event in.
    pub time_zone: String,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn credentials(expires_at: Option<DateTime<Utc>>) -> CalendarCredentials {
        CalendarCredentials {
            access_token: "ya29.secret".into(),
            refresh_token: Some("1//refresh".into()),
            expires_at,
            scope: None,
        }
    }

    #[test]
    fn expiry_is_checked_against_given_instant() {
        let now = Utc::now();
        assert!(!credentials(None).is_expired_at(now));
        assert!(!credentials(Some(now + Duration::minutes(5))).is_expired_at(now));
        assert!(credentials(Some(now)).is_expired_at(now));
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let rendered = format!("{:?}", credentials(None));
        assert!(!rendered.contains("ya29.secret"));
        assert!(!rendered.contains("1//refresh"));
    }
}
