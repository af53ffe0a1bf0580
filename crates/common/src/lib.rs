//! Reusable infrastructure primitives shared across StudySync crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: PKCE helpers and signed session tokens
//! - `observability`: tracing spans and events inside the primitives
//! - `platform`: OAuth HTTP client and the SQLite connection pool

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod security;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;
#[cfg(feature = "platform")]
pub mod storage;

// Re-export commonly used types for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use security::{SessionTokenError, SessionTokenSigner};
