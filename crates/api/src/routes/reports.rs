//! Reporting views plus the export/import pair

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use studysync_domain::{
    ImportSummary, OverallStats, StudyExport, StudySession, TheoremId, TheoremSearchHit,
};

use super::rejected;
use crate::context::AppContext;
use crate::error::ApiResult;

const EXPORT_DISPOSITION: &str = "attachment; filename=\"studysync-export.json\"";

/// Optional theorem filter for `/sessions`.
#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
    pub theorem_id: Option<TheoremId>,
}

/// Recorded sessions ordered by start time, optionally for one theorem.
pub async fn sessions(
    State(ctx): State<Arc<AppContext>>,
    query: Result<Query<SessionsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<StudySession>>> {
    let Query(query) = query.map_err(rejected)?;
    Ok(Json(ctx.study.sessions(query.theorem_id).await?))
}

/// Syllabus-wide progress totals.
pub async fn stats(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<OverallStats>> {
    Ok(Json(ctx.study.overall_stats(Utc::now()).await?))
}

/// Query string of `/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Trimmed query echoed back with its hits.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<TheoremSearchHit>,
}

/// Theorem search over names and statements.
pub async fn search(
    State(ctx): State<Arc<AppContext>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Query(SearchQuery { q }) = query.map_err(rejected)?;
    let results = ctx.study.search(&q).await?;
    Ok(Json(SearchResponse { query: q.trim().to_string(), results }))
}

/// Every rating and session as a downloadable JSON attachment.
pub async fn export(State(ctx): State<Arc<AppContext>>) -> ApiResult<Response> {
    let snapshot = ctx.study.export(Utc::now()).await?;
    Ok((
        [(CONTENT_DISPOSITION, HeaderValue::from_static(EXPORT_DISPOSITION))],
        Json(snapshot),
    )
        .into_response())
}

/// Restore a dump produced by `/export`. Invalid entries reject the whole
/// body and nothing is written.
pub async fn import(
    State(ctx): State<Arc<AppContext>>,
    body: Result<Json<StudyExport>, JsonRejection>,
) -> ApiResult<Json<ImportSummary>> {
    let Json(snapshot) = body.map_err(rejected)?;
    Ok(Json(ctx.study.import(snapshot).await?))
}
