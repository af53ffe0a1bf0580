use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use studysync_core::CalendarGateway;
use studysync_domain::{
    AuthorizationRequest, CalendarCredentials, NewCalendarEvent, Result as DomainResult,
    StudySyncError,
};

/// Scriptable mock for `CalendarGateway`.
///
/// Records every event it is asked to create. When `fail_with_status` is
/// set, `create_event` fails with that status and records nothing.
#[derive(Default, Clone)]
pub struct MockCalendarGateway {
    created: Arc<Mutex<Vec<NewCalendarEvent>>>,
    fail_with_status: Arc<Mutex<Option<u16>>>,
}

impl MockCalendarGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create_event` fail with `status`.
    pub fn failing(self, status: u16) -> Self {
        *self.fail_with_status.lock().unwrap() = Some(status);
        self
    }

    pub fn created_events(&self) -> Vec<NewCalendarEvent> {
        self.created.lock().unwrap().clone()
    }
}

/// Credentials valid for an hour from now.
pub fn valid_credentials() -> CalendarCredentials {
    CalendarCredentials {
        access_token: "ya29.test".into(),
        refresh_token: None,
        expires_at: Some(Utc::now() + Duration::hours(1)),
        scope: None,
    }
}

/// Credentials that expired a minute ago.
pub fn expired_credentials() -> CalendarCredentials {
    CalendarCredentials { expires_at: Some(Utc::now() - Duration::minutes(1)), ..valid_credentials() }
}

#[async_trait]
impl CalendarGateway for MockCalendarGateway {
    fn authorization_request(&self) -> DomainResult<AuthorizationRequest> {
        Ok(AuthorizationRequest {
            url: "https://accounts.example.com/auth?state=fixed-state".into(),
            state: "fixed-state".into(),
            pkce_verifier: "fixed-verifier".into(),
        })
    }

    async fn exchange_code(
        &self,
        code: &str,
        _pkce_verifier: &str,
    ) -> DomainResult<CalendarCredentials> {
        if code == "good-code" {
            Ok(valid_credentials())
        } else {
            Err(StudySyncError::Auth("invalid_grant".into()))
        }
    }

    async fn create_event(
        &self,
        _credentials: &CalendarCredentials,
        event: &NewCalendarEvent,
    ) -> DomainResult<String> {
        if let Some(status) = *self.fail_with_status.lock().unwrap() {
            return Err(StudySyncError::CalendarApi { status, message: "mock failure".into() });
        }
        let mut created = self.created.lock().unwrap();
        created.push(event.clone());
        Ok(format!("evt-{}", created.len()))
    }
}
