//! OAuth 2.0 + PKCE primitives
//!
//! # Module Organization
//!
//! - **[`types`]**: Core OAuth types (`TokenSet`, `OAuthConfig`, `OAuthError`)
//! - **[`pkce`]**: PKCE challenge and CSRF state generation
//! - **[`client`]**: OAuth HTTP client for authorization and token exchange
//!
//! Provider adapters build an [`OAuthConfig`] and hold an [`OAuthClient`];
//! token storage is left to the caller.

pub mod client;
pub mod pkce;
pub mod types;

pub use client::{OAuthClient, OAuthClientError};
pub use pkce::{generate_code_challenge, generate_code_verifier, generate_state, PKCEChallenge};
pub use types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};
