#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::Value;
use studysync_core::CalendarGateway;
use studysync_domain::{
    AuthorizationRequest, CalendarCredentials, Config, NewCalendarEvent, Result, Secret,
    StudySyncError,
};
use studysync_lib::{router, AppContext};
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

pub const GOOD_CODE: &str = "good-code";
const VERIFIER: &str = "verifier-123";

#[derive(Default)]
struct MockState {
    events: Vec<NewCalendarEvent>,
    event_failure: Option<StudySyncError>,
    issued: u32,
}

/// In-memory `CalendarGateway` with scriptable failures.
#[derive(Clone, Default)]
pub struct MockCalendar {
    state: Arc<Mutex<MockState>>,
}

impl MockCalendar {
    pub fn fail_events_with(&self, error: StudySyncError) {
        self.state.lock().unwrap().event_failure = Some(error);
    }

    pub fn events(&self) -> Vec<NewCalendarEvent> {
        self.state.lock().unwrap().events.clone()
    }
}

#[async_trait]
impl CalendarGateway for MockCalendar {
    fn authorization_request(&self) -> Result<AuthorizationRequest> {
        let mut state = self.state.lock().unwrap();
        state.issued += 1;
        let csrf = format!("csrf-{}", state.issued);
        Ok(AuthorizationRequest {
            url: format!("https://accounts.example.test/o/oauth2/auth?state={csrf}"),
            state: csrf,
            pkce_verifier: VERIFIER.to_string(),
        })
    }

    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> Result<CalendarCredentials> {
        if code != GOOD_CODE || pkce_verifier != VERIFIER {
            return Err(StudySyncError::Auth("invalid_grant".into()));
        }
        Ok(CalendarCredentials {
            access_token: "ya29.mock".into(),
            refresh_token: None,
            expires_at: Some(Utc::now() + Duration::hours(1)),
            scope: None,
        })
    }

    async fn create_event(
        &self,
        _credentials: &CalendarCredentials,
        event: &NewCalendarEvent,
    ) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.event_failure.clone() {
            return Err(error);
        }
        state.events.push(event.clone());
        Ok(format!("evt-{}", state.events.len()))
    }
}

/// Router over a throw-away database and a mock calendar.
pub struct TestApp {
    pub router: Router,
    pub calendar: MockCalendar,
    pub ctx: Arc<AppContext>,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("api-test.db").display().to_string();
        config.database.pool_size = 4;
        config.session.secret_key = Secret::new("test-session-secret-key-0123456789abcdef");
        config.calendar.client_id = "test-client".into();
        config.study.time_zone = "Europe/Berlin".into();
        config.validate().unwrap();

        let calendar = MockCalendar::default();
        let ctx = Arc::new(AppContext::with_calendar(config, Arc::new(calendar.clone())).unwrap());
        Self { router: router(Arc::clone(&ctx)), calendar, ctx, _dir: dir }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(request(Method::GET, uri, cookie, None)).await
    }

    pub async fn post_json(&self, uri: &str, cookie: Option<&str>, body: Value) -> Response<Body> {
        self.send(request(Method::POST, uri, cookie, Some(body.to_string()))).await
    }

    /// Run the consent round trip and return the authenticated cookie.
    pub async fn login(&self) -> String {
        let start = self.get("/oauth2/start", None).await;
        assert_eq!(start.status(), StatusCode::FOUND);
        let cookie = session_cookie(&start);
        let state = query_param(&location(&start), "state");

        let callback = self
            .get(&format!("/oauth2/callback?code={GOOD_CODE}&state={state}"), Some(&cookie))
            .await;
        assert_eq!(callback.status(), StatusCode::FOUND);
        assert_eq!(location(&callback), "/");
        cookie
    }
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder.header(CONTENT_TYPE, "application/json").body(Body::from(body)),
        None => builder.body(Body::empty()),
    };
    request.unwrap()
}

pub async fn json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` pair from the response's `Set-Cookie`.
pub fn session_cookie(response: &Response<Body>) -> String {
    let header = response.headers().get(SET_COOKIE).expect("set-cookie").to_str().unwrap();
    header.split(';').next().unwrap().to_string()
}

pub fn location(response: &Response<Body>) -> String {
    response.headers().get(LOCATION).expect("location").to_str().unwrap().to_string()
}

pub fn query_param(url: &str, name: &str) -> String {
    let url = Url::parse(url).unwrap();
    url.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned()).unwrap()
}
