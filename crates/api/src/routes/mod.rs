//! HTTP surface: JSON routes over `StudyService` plus the OAuth dance

mod health;
mod oauth;
mod reports;
mod study;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use studysync_domain::StudySyncError;

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};
use crate::utils::logging::log_request;

/// Build the application router over a shared context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(study::index))
        .route("/chapters/{chapter_id}", get(study::chapter))
        .route("/chapters/{chapter_id}/theorems/{theorem_id}/confidence", post(study::rate))
        .route("/theorems/{theorem_id}/schedule", post(study::schedule))
        .route("/oauth2/start", get(oauth::start))
        .route("/oauth2/callback", get(oauth::callback))
        .route("/oauth2/logout", post(oauth::logout))
        .route("/oauth2/status", get(oauth::status))
        .route("/sessions", get(reports::sessions))
        .route("/stats", get(reports::stats))
        .route("/search", get(reports::search))
        .route("/export", get(reports::export))
        .route("/import", post(reports::import))
        .route("/health", get(health::health))
        .route_layer(middleware::from_fn(log_requests))
        .with_state(ctx)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path().to_string(), |path| path.as_str().to_string());
    let started = Instant::now();

    let response = next.run(request).await;
    log_request(method.as_str(), &route, response.status(), started.elapsed());
    response
}

/// 302 to `location`.
fn found(location: &str) -> ApiResult<Response> {
    let location = HeaderValue::from_str(location).map_err(|e| {
        ApiError(StudySyncError::Internal(format!("unencodable redirect target: {e}")))
    })?;
    Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
}

/// Extractor rejections (bad JSON, bad path or query) are client errors.
fn rejected(rejection: impl fmt::Display) -> ApiError {
    ApiError(StudySyncError::Validation(rejection.to_string()))
}
