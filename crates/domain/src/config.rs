//! Application configuration structures
//!
//! Built once at startup by the infra config loader and handed to every
//! component that needs it. Nothing here reads the environment.

use std::fmt;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_SESSION_MINUTES, MAX_SESSION_MINUTES, MAX_SESSION_TTL_MINUTES, MIN_SECRET_KEY_BYTES,
    MIN_SESSION_MINUTES, MIN_SESSION_TTL_MINUTES,
};
use crate::errors::{Result, StudySyncError};

const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const GOOGLE_CALENDAR_EVENTS_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

/// String whose value never appears in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a sensitive value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value. Keep it out of logs.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(<redacted>)")
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub calendar: CalendarConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    pub study: StudyConfig,
}

impl Config {
    /// Check cross-field constraints that serde defaults cannot express.
    ///
    /// # Errors
    /// Returns `StudySyncError::Config` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.session.secret_key.expose().len() < MIN_SECRET_KEY_BYTES {
            return Err(StudySyncError::Config(format!(
                "session secret key must be at least {MIN_SECRET_KEY_BYTES} bytes"
            )));
        }
        let ttl = self.session.ttl_minutes;
        if !(MIN_SESSION_TTL_MINUTES..=MAX_SESSION_TTL_MINUTES).contains(&ttl) {
            return Err(StudySyncError::Config(format!(
                "session ttl_minutes must be within {MIN_SESSION_TTL_MINUTES}..={MAX_SESSION_TTL_MINUTES}"
            )));
        }
        if self.database.pool_size == 0 {
            return Err(StudySyncError::Config("database pool size must be positive".into()));
        }
        if self.calendar.client_id.is_empty() {
            return Err(StudySyncError::Config("calendar client_id is required".into()));
        }
        if self.calendar.redirect_uri.is_empty() {
            return Err(StudySyncError::Config("calendar redirect_uri is required".into()));
        }
        self.study.tz()?;
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&self.study.default_session_minutes)
        {
            return Err(StudySyncError::Config(format!(
                "default_session_minutes must be within {MIN_SESSION_MINUTES}..={MAX_SESSION_MINUTES}"
            )));
        }
        Ok(())
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:5000".to_string() }
    }
}

/// SQLite settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "study_sync.db".to_string(), pool_size: 8, busy_timeout_ms: 5_000 }
    }
}

/// Calendar provider client credentials and endpoints.
///
/// Endpoints default to Google and are only overridden in tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub client_id: String,
    pub client_secret: Secret,
    pub redirect_uri: String,
    pub calendar_id: String,
    pub scopes: Vec<String>,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: Secret::default(),
            redirect_uri: "http://localhost:5000/oauth2/callback".to_string(),
            calendar_id: "primary".to_string(),
            scopes: vec![GOOGLE_CALENDAR_EVENTS_SCOPE.to_string()],
            authorization_endpoint: GOOGLE_AUTHORIZATION_ENDPOINT.to_string(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            api_base_url: GOOGLE_CALENDAR_API_BASE.to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Browser session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// HMAC key for session cookies. Filled from the environment only.
    #[serde(skip)]
    pub secret_key: Secret,
    pub ttl_minutes: i64,
    /// Emit the `Secure` cookie attribute (enable behind HTTPS).
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { secret_key: Secret::default(), ttl_minutes: 120, secure_cookie: false }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Fallback filter when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::Pretty, filter: "info,studysync=debug".to_string() }
    }
}

/// Study scheduling preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub default_session_minutes: u32,
    /// IANA zone used for naive datetimes and calendar display
    pub time_zone: String,
}

impl StudyConfig {
    /// Parse the configured zone.
    ///
    /// # Errors
    /// Returns `StudySyncError::Config` for an unknown IANA name.
    pub fn tz(&self) -> Result<Tz> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|e| StudySyncError::Config(format!("invalid time zone '{}': {e}", self.time_zone)))
    }
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self { default_session_minutes: DEFAULT_SESSION_MINUTES, time_zone: "UTC".to_string() }
    }
}
