use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use studysync_common::security::{generate_session_id, SessionTokenSigner};
use studysync_domain::constants::{
    MAX_SESSION_TTL_MINUTES, MIN_SECRET_KEY_BYTES, MIN_SESSION_TTL_MINUTES,
};
use studysync_domain::{CalendarCredentials, Result, SessionConfig, StudySyncError};
use tracing::debug;

/// Calendar authorization progress for one browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OAuthState {
    #[default]
    Unauthenticated,
    AwaitingCallback { state: String, pkce_verifier: String },
    Authenticated { credentials: CalendarCredentials },
}

impl OAuthState {
    /// Lower-case name reported by `/oauth2/status` and in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::AwaitingCallback { .. } => "awaiting_callback",
            Self::Authenticated { .. } => "authenticated",
        }
    }
}

#[derive(Debug)]
struct SessionEntry {
    oauth: OAuthState,
    expires_at: DateTime<Utc>,
}

/// A live session: its id and the signed token the cookie carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: String,
    pub token: String,
}

/// In-memory session table with signed ids and a fixed time-to-live.
pub struct SessionStore {
    entries: DashMap<String, SessionEntry>,
    signer: SessionTokenSigner,
    ttl: Duration,
}

impl SessionStore {
    /// # Errors
    /// `Config` when the secret key is shorter than
    /// [`MIN_SECRET_KEY_BYTES`] or the time-to-live is outside
    /// [`MIN_SESSION_TTL_MINUTES`]..=[`MAX_SESSION_TTL_MINUTES`].
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let signer =
            SessionTokenSigner::new(config.secret_key.expose().as_bytes(), MIN_SECRET_KEY_BYTES)
                .map_err(|e| StudySyncError::Config(format!("session secret key: {e}")))?;

        if !(MIN_SESSION_TTL_MINUTES..=MAX_SESSION_TTL_MINUTES).contains(&config.ttl_minutes) {
            return Err(StudySyncError::Config(format!(
                "session ttl of {} minutes is out of range",
                config.ttl_minutes
            )));
        }

        Ok(Self { entries: DashMap::new(), signer, ttl: Duration::minutes(config.ttl_minutes) })
    }

    /// Session id for a cookie token whose signature checks out and whose
    /// entry has not expired.
    pub fn resolve(&self, token: Option<&str>, now: DateTime<Utc>) -> Option<String> {
        let id = self.signer.verify(token?).ok()?;
        let live = self.entries.get(id).is_some_and(|entry| entry.expires_at > now);
        if live {
            Some(id.to_string())
        } else {
            self.entries.remove_if(id, |_, entry| entry.expires_at <= now);
            None
        }
    }

    /// Keep the session behind `token` alive, or start a fresh
    /// unauthenticated one.
    pub fn touch_or_create(&self, token: Option<&str>, now: DateTime<Utc>) -> SessionHandle {
        if let Some(id) = self.resolve(token, now) {
            if let Some(mut entry) = self.entries.get_mut(&id) {
                entry.expires_at = now + self.ttl;
            }
            let token = self.signer.sign(&id);
            return SessionHandle { id, token };
        }

        self.purge_expired(now);
        let id = generate_session_id();
        self.entries.insert(
            id.clone(),
            SessionEntry { oauth: OAuthState::Unauthenticated, expires_at: now + self.ttl },
        );
        debug!(sessions = self.entries.len(), "Session created");
        let token = self.signer.sign(&id);
        SessionHandle { id, token }
    }

    /// Current state; unknown or expired sessions are unauthenticated.
    pub fn oauth_state(&self, id: &str, now: DateTime<Utc>) -> OAuthState {
        self.entries
            .get(id)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.oauth.clone())
            .unwrap_or_default()
    }

    /// Replace the OAuth state of a session. Returns `false` if the
    /// session no longer exists.
    pub fn set_oauth_state(&self, id: &str, state: OAuthState) -> bool {
        match self.entries.get_mut(id) {
            Some(mut entry) => {
                entry.oauth = state;
                true
            }
            None => false,
        }
    }

    /// Credentials of an authenticated, unexpired session.
    pub fn credentials(&self, id: &str, now: DateTime<Utc>) -> Option<CalendarCredentials> {
        match self.oauth_state(id, now) {
            OAuthState::Authenticated { credentials } => Some(credentials),
            _ => None,
        }
    }

    /// Lifetime granted by each touch; also the cookie `Max-Age`.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Entries held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no session entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn purge_expired(&self, now: DateTime<Utc>) {
        self.entries.retain(|_, entry| entry.expires_at > now);
    }
}
