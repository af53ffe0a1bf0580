//! # StudySync App
//!
//! HTTP application layer - routes, sessions and the entry point wiring.
//!
//! This crate contains:
//! - The axum router (JSON pages and the OAuth redirect flow)
//! - Signed browser sessions holding calendar credentials in memory
//! - Application context (dependency injection)
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod error;
pub mod routes;
pub mod session;
pub mod utils;

pub use context::AppContext;
pub use error::{ApiError, ApiResult};
pub use routes::router;
