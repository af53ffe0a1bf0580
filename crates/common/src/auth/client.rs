//! OAuth 2.0 client implementation with PKCE support
//!
//! Handles the authorization-code flow for web server clients:
//! - Authorization URL building
//! - Authorization code exchange
//!
//! The client is stateless. The caller keeps the PKCE verifier and CSRF
//! state between the redirect and the callback.

use chrono::Utc;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::pkce::PKCEChallenge;
use super::types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};

/// Error type for OAuth client operations
#[derive(Debug, Error)]
pub enum OAuthClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// OAuth server returned a standard error body
    #[error("OAuth error: {0}")]
    OAuth(OAuthError),

    /// Non-success status without a parseable OAuth error body
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Failed to parse a success response
    #[error("Parse error: {0}")]
    Parse(String),
}

/// OAuth 2.0 client with PKCE support (RFC 6749 + RFC 7636)
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http: Client,
}

impl OAuthClient {
    /// Create a client that sends token requests through `http`.
    #[must_use]
    pub fn new(config: OAuthConfig, http: Client) -> Self {
        Self { config, http }
    }

    /// Build the consent URL for a prepared challenge.
    #[must_use]
    pub fn authorization_url(&self, challenge: &PKCEChallenge) -> String {
        let scope = self.config.scope_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("response_type", "code"),
            ("client_id", &self.config.client_id),
            ("redirect_uri", &self.config.redirect_uri),
            ("state", &challenge.state),
            ("code_challenge", &challenge.code_challenge),
            ("code_challenge_method", challenge.challenge_method()),
            ("scope", &scope),
        ];
        params.extend(
            self.config.extra_authorize_params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if self.config.authorization_endpoint.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query_string}", self.config.authorization_endpoint)
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    /// Returns `OAuthClientError::OAuth` when the server rejects the code,
    /// `UnexpectedStatus` for other non-2xx responses and `RequestFailed`
    /// on transport failure.
    #[instrument(skip(self, code, code_verifier), fields(token_endpoint = %self.config.token_endpoint))]
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ];

        if let Some(secret) = self.config.client_secret.as_deref().filter(|s| !s.is_empty()) {
            form.push(("client_secret", secret));
        }

        let response = self.http.post(&self.config.token_endpoint).form(&form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Token exchange rejected");
            return Err(match serde_json::from_str::<OAuthError>(&body) {
                Ok(error) => OAuthClientError::OAuth(error),
                Err(_) => OAuthClientError::UnexpectedStatus { status: status.as_u16(), body },
            });
        }

        let token_response: TokenResponse =
            response.json().await.map_err(|e| OAuthClientError::Parse(e.to_string()))?;

        debug!(has_refresh_token = token_response.refresh_token.is_some(), "Token exchange succeeded");
        Ok(TokenSet::issued_at(token_response, Utc::now()))
    }
}
