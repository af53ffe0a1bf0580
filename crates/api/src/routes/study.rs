use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use studysync_domain::{
    CalendarCredentials, ChapterDetail, ChapterId, ChapterSummary, ConfidenceRating, StudySession,
    StudySyncError, TheoremId,
};

use super::rejected;
use crate::context::AppContext;
use crate::error::ApiResult;
use crate::session::read_session_cookie;
use crate::utils::time::parse_start;

/// Body of `/`.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub chapters: Vec<ChapterSummary>,
}

/// Chapter list with per-chapter progress.
pub async fn index(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<IndexResponse>> {
    let chapters = ctx.study.chapter_summaries().await?;
    Ok(Json(IndexResponse { chapters }))
}

/// One chapter with its theorems and their current ratings.
pub async fn chapter(
    State(ctx): State<Arc<AppContext>>,
    path: Result<Path<ChapterId>, PathRejection>,
) -> ApiResult<Json<ChapterDetail>> {
    let Path(chapter_id) = path.map_err(rejected)?;
    Ok(Json(ctx.study.chapter_detail(chapter_id).await?))
}

/// Score as sent by a JSON client or a form-style string field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ScoreInput {
    Number(i64),
    Text(String),
}

impl ScoreInput {
    fn parse(&self) -> Result<i64, StudySyncError> {
        match self {
            Self::Number(score) => Ok(*score),
            Self::Text(text) => text.trim().parse().map_err(|_| {
                StudySyncError::Validation(format!("score must be an integer, got {text:?}"))
            }),
        }
    }
}

/// Body of a confidence rating.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub score: ScoreInput,
}

/// Stored rating and the review it booked, if any.
#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub rating: ConfidenceRating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<StudySession>,
}

/// Record a confidence score; a low score also books a review.
pub async fn rate(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    path: Result<Path<(ChapterId, TheoremId)>, PathRejection>,
    body: Result<Json<RateRequest>, JsonRejection>,
) -> ApiResult<Json<RateResponse>> {
    let Path((chapter_id, theorem_id)) = path.map_err(rejected)?;
    let Json(request) = body.map_err(rejected)?;
    let score = request.score.parse()?;

    let now = Utc::now();
    let credentials = session_credentials(&ctx, &headers);
    let outcome = ctx
        .study
        .rate_confidence(chapter_id, theorem_id, score, credentials.as_ref(), now)
        .await?;

    Ok(Json(RateResponse { rating: outcome.rating, review: outcome.review }))
}

/// Body of a primary session booking; `start` is RFC 3339 or a naive local time.
#[derive(Debug, Deserialize)]
pub struct ScheduleBody {
    pub start: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

/// Book a primary study session on the calendar.
pub async fn schedule(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    path: Result<Path<TheoremId>, PathRejection>,
    body: Result<Json<ScheduleBody>, JsonRejection>,
) -> ApiResult<Json<StudySession>> {
    let Path(theorem_id) = path.map_err(rejected)?;
    let Json(request) = body.map_err(rejected)?;
    let tz = ctx.config.study.tz()?;
    let start = parse_start(&request.start, tz)?;

    let now = Utc::now();
    let credentials = session_credentials(&ctx, &headers);
    let session = ctx
        .study
        .schedule_primary(theorem_id, start, request.duration_minutes, credentials.as_ref(), now)
        .await?;

    Ok(Json(session))
}

fn session_credentials(ctx: &AppContext, headers: &HeaderMap) -> Option<CalendarCredentials> {
    let now = Utc::now();
    let id = ctx.sessions.resolve(read_session_cookie(headers), now)?;
    ctx.sessions.credentials(&id, now)
}
