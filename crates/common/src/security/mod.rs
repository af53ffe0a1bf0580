//! Security primitives
//!
//! Signed opaque tokens for browser session cookies.

pub mod session_token;

pub use session_token::{generate_session_id, SessionTokenError, SessionTokenSigner};
