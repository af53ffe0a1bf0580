//! Calendar authorization: consent redirect, callback, logout and status
//!
//! Failures during the callback never surface as error bodies; the browser
//! is sent back to `/oauth2/start` to try again.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::found;
use crate::context::AppContext;
use crate::error::ApiResult;
use crate::session::{read_session_cookie, session_cookie_header, OAuthState};

const RETRY_LOCATION: &str = "/oauth2/start";
const HOME_LOCATION: &str = "/";

/// Begin authorization: store a fresh state and PKCE verifier on the
/// session and redirect to the provider's consent screen.
pub async fn start(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> ApiResult<Response> {
    let now = Utc::now();
    let handle = ctx.sessions.touch_or_create(read_session_cookie(&headers), now);
    let request = ctx.calendar.authorization_request()?;

    ctx.sessions.set_oauth_state(
        &handle.id,
        OAuthState::AwaitingCallback { state: request.state, pkce_verifier: request.pkce_verifier },
    );
    info!("Redirecting to calendar consent screen");

    let cookie =
        session_cookie_header(&handle.token, ctx.sessions.ttl(), ctx.config.session.secure_cookie)?;
    let redirect = found(&request.url)?;
    Ok(([(SET_COOKIE, cookie)], redirect).into_response())
}

/// Query parameters the provider appends to the callback redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Provider redirect target. Success stores the credentials and returns
/// home; anything else sends the browser back to `/oauth2/start`.
pub async fn callback(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    query: Result<Query<CallbackParams>, QueryRejection>,
) -> ApiResult<Response> {
    let now = Utc::now();
    let Some(id) = ctx.sessions.resolve(read_session_cookie(&headers), now) else {
        warn!("OAuth callback without a live session");
        return found(RETRY_LOCATION);
    };

    let pending = ctx.sessions.oauth_state(&id, now);
    // Any outcome other than success leaves the session unauthenticated.
    ctx.sessions.set_oauth_state(&id, OAuthState::Unauthenticated);

    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!(%rejection, "Undecodable OAuth callback query");
            return found(RETRY_LOCATION);
        }
    };
    if let Some(error) = params.error {
        warn!(%error, "Provider returned an authorization error");
        return found(RETRY_LOCATION);
    }

    let (state, pkce_verifier) = match pending {
        OAuthState::AwaitingCallback { state, pkce_verifier } => (state, pkce_verifier),
        other => {
            warn!(state = other.label(), "OAuth callback outside of a pending authorization");
            return found(RETRY_LOCATION);
        }
    };
    if params.state.as_deref() != Some(state.as_str()) {
        warn!("OAuth state mismatch");
        return found(RETRY_LOCATION);
    }
    let Some(code) = params.code.filter(|code| !code.is_empty()) else {
        warn!("OAuth callback without a code");
        return found(RETRY_LOCATION);
    };

    match ctx.calendar.exchange_code(&code, &pkce_verifier).await {
        Ok(credentials) => {
            ctx.sessions.set_oauth_state(&id, OAuthState::Authenticated { credentials });
            info!("Calendar authorization complete");
            found(HOME_LOCATION)
        }
        Err(error) => {
            warn!(%error, "Authorization code exchange failed");
            found(RETRY_LOCATION)
        }
    }
}

/// Body of `/oauth2/status` and `/oauth2/logout`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Drop any calendar authorization held by the session.
pub async fn logout(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Json<StatusResponse> {
    let now = Utc::now();
    if let Some(id) = ctx.sessions.resolve(read_session_cookie(&headers), now) {
        ctx.sessions.set_oauth_state(&id, OAuthState::Unauthenticated);
        info!("Session logged out");
    }
    Json(StatusResponse { state: OAuthState::Unauthenticated.label(), expires_at: None })
}

/// Current authorization state and, when signed in, the token expiry.
pub async fn status(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Json<StatusResponse> {
    let now = Utc::now();
    let state = ctx
        .sessions
        .resolve(read_session_cookie(&headers), now)
        .map(|id| ctx.sessions.oauth_state(&id, now))
        .unwrap_or_default();

    // Expired credentials count as signed out.
    let response = match &state {
        OAuthState::Authenticated { credentials } if credentials.is_expired_at(now) => {
            StatusResponse { state: OAuthState::Unauthenticated.label(), expires_at: None }
        }
        OAuthState::Authenticated { credentials } => {
            StatusResponse { state: state.label(), expires_at: credentials.expires_at }
        }
        other => StatusResponse { state: other.label(), expires_at: None },
    };
    Json(response)
}
