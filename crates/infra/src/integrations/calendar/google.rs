//! Google Calendar adapter: OAuth consent, code exchange and event creation.

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use studysync_common::auth::{OAuthClient, OAuthConfig, PKCEChallenge, TokenSet};
use studysync_core::CalendarGateway;
use studysync_domain::config::CalendarConfig;
use studysync_domain::{
    AuthorizationRequest, CalendarCredentials, NewCalendarEvent, Result, StudySyncError,
};
use tracing::{info, instrument, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// `CalendarGateway` backed by the Google Calendar v3 REST API.
#[derive(Debug, Clone)]
pub struct GoogleCalendarGateway {
    oauth: OAuthClient,
    http: HttpClient,
    api_base_url: String,
    calendar_id: String,
}

impl GoogleCalendarGateway {
    /// Gateway for the configured calendar. An empty client secret is left
    /// out of the token request.
    pub fn new(config: &CalendarConfig, http: HttpClient) -> Self {
        let secret = config.client_secret.expose();
        let oauth_config = OAuthConfig {
            authorization_endpoint: config.authorization_endpoint.clone(),
            token_endpoint: config.token_endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: (!secret.is_empty()).then(|| secret.to_string()),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scopes.clone(),
            extra_authorize_params: vec![
                ("access_type".to_string(), "online".to_string()),
                ("include_granted_scopes".to_string(), "true".to_string()),
            ],
        };

        Self {
            oauth: OAuthClient::new(oauth_config, http.inner().clone()),
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
        }
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarGateway {
    fn authorization_request(&self) -> Result<AuthorizationRequest> {
        let challenge = PKCEChallenge::generate();
        let url = self.oauth.authorization_url(&challenge);
        Ok(AuthorizationRequest {
            url,
            state: challenge.state,
            pkce_verifier: challenge.code_verifier,
        })
    }

    #[instrument(skip_all)]
    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> Result<CalendarCredentials> {
        let tokens = self.oauth.exchange_code(code, pkce_verifier).await.map_err(|err| {
            warn!(error = %err, "authorization code exchange failed");
            StudySyncError::from(InfraError::from(err))
        })?;

        info!(scope = ?tokens.scope, "calendar authorization granted");
        Ok(credentials_from(tokens))
    }

    #[instrument(skip(self, credentials, event), fields(calendar_id = %self.calendar_id, title = %event.title))]
    async fn create_event(
        &self,
        credentials: &CalendarCredentials,
        event: &NewCalendarEvent,
    ) -> Result<String> {
        let body = EventBody::from(event);
        let request = self
            .http
            .request(Method::POST, self.events_url())
            .bearer_auth(&credentials.access_token)
            .json(&body);

        let response = self.http.send(request).await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = google_error_message(&text)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "calendar request failed".to_string());
            warn!(status = status.as_u16(), %message, "calendar rejected event");
            return Err(StudySyncError::CalendarApi { status: status.as_u16(), message });
        }

        let created: CreatedEvent = response.json().await.map_err(|err| {
            StudySyncError::CalendarApi {
                status: status.as_u16(),
                message: format!("unreadable event response: {err}"),
            }
        })?;

        info!(event_id = %created.id, "calendar event created");
        Ok(created.id)
    }
}

fn credentials_from(tokens: TokenSet) -> CalendarCredentials {
    CalendarCredentials {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_at: tokens.expires_at,
        scope: tokens.scope,
    }
}

/// Extract `error.message` from a Google JSON error body.
fn google_error_message(body: &str) -> Option<String> {
    let parsed: GoogleErrorResponse = serde_json::from_str(body).ok()?;
    Some(parsed.error.message).filter(|m| !m.is_empty())
}

#[derive(Serialize)]
struct EventBody<'a> {
    summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    start: EventTime<'a>,
    end: EventTime<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

impl<'a> From<&'a NewCalendarEvent> for EventBody<'a> {
    fn from(event: &'a NewCalendarEvent) -> Self {
        Self {
            summary: &event.title,
            description: event.description.as_deref(),
            start: EventTime {
                date_time: event.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                time_zone: &event.time_zone,
            },
            end: EventTime {
                date_time: event.end.to_rfc3339_opts(SecondsFormat::Secs, true),
                time_zone: &event.time_zone,
            },
        }
    }
}

#[derive(Deserialize)]
struct CreatedEvent {
    id: String,
}

#[derive(Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    message: String,
}
