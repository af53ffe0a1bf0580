//! Browser sessions and the per-session OAuth state machine
//!
//! The browser holds `studysync_session=<id>.<sig>`; everything else lives in
//! memory keyed by id. Calendar credentials never leave this store.

mod cookie;
mod store;

pub use cookie::{read_session_cookie, session_cookie_header};
pub use store::{OAuthState, SessionHandle, SessionStore};
