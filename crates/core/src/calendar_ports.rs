//! Calendar integration port interfaces

use async_trait::async_trait;
use studysync_domain::{AuthorizationRequest, CalendarCredentials, NewCalendarEvent, Result};

/// Write-only access to the user's calendar provider.
///
/// Implementations never retry; a failed call surfaces immediately so the
/// caller can abandon the whole action.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Build a consent URL with fresh CSRF state and PKCE verifier.
    fn authorization_request(&self) -> Result<AuthorizationRequest>;

    /// Trade an authorization code for credentials.
    ///
    /// Any provider rejection is `StudySyncError::Auth`.
    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> Result<CalendarCredentials>;

    /// Create an event and return the provider's event id.
    ///
    /// Non-2xx responses and transport failures are
    /// `StudySyncError::CalendarApi` (status 0 when no response arrived).
    async fn create_event(
        &self,
        credentials: &CalendarCredentials,
        event: &NewCalendarEvent,
    ) -> Result<String>;
}
