//! OAuth 2.0 types and structures

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth 2.0 access and refresh tokens with metadata
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token for API calls
    pub access_token: String,

    /// Optional because providers only issue one for offline access
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type (always "Bearer" for OAuth 2.0)
    pub token_type: String,

    /// Access token lifetime in seconds as reported by the server
    pub expires_in: i64,

    /// Absolute expiration timestamp, computed when the response arrives
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Granted scopes (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenSet {
    /// Create a new `TokenSet` with expiry computed relative to `issued_at`.
    #[must_use]
    pub fn issued_at(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        let expires_at = (response.expires_in > 0)
            .then(|| issued_at + chrono::Duration::seconds(response.expires_in));

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_in: response.expires_in,
            expires_at,
            scope: response.scope,
        }
    }

    /// Whether the access token is expired at `now`. Tokens without an
    /// expiry never expire.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// OAuth token response from authorization server (RFC 6749 §5.1)
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: i64,
    pub scope: Option<String>,
}

/// OAuth configuration for an authorization server
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Consent page URL
    pub authorization_endpoint: String,

    /// Token exchange URL
    pub token_endpoint: String,

    /// OAuth client ID
    pub client_id: String,

    /// Client secret for confidential (web server) clients
    pub client_secret: Option<String>,

    /// Redirect URI registered with the provider
    pub redirect_uri: String,

    /// OAuth scopes to request
    pub scopes: Vec<String>,

    /// Provider-specific authorize parameters (e.g. `access_type`)
    pub extra_authorize_params: Vec<(String, String)>,
}

impl OAuthConfig {
    /// Get scopes as space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

/// OAuth error response from authorization server (RFC 6749 §5.2)
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}
