//! HTTP mapping for domain errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use studysync_domain::StudySyncError;
use tracing::error;

/// Handler error: a domain error rendered as `{"error": {type, message}}`.
#[derive(Debug)]
pub struct ApiError(pub StudySyncError);

/// Result type for route handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// HTTP status for the wrapped error kind.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            StudySyncError::Validation(_) => StatusCode::BAD_REQUEST,
            StudySyncError::NotFound(_) => StatusCode::NOT_FOUND,
            StudySyncError::Auth(_) => StatusCode::UNAUTHORIZED,
            StudySyncError::CalendarApi { .. } => StatusCode::BAD_GATEWAY,
            StudySyncError::Database(_)
            | StudySyncError::Config(_)
            | StudySyncError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StudySyncError> for ApiError {
    fn from(err: StudySyncError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() && !matches!(self.0, StudySyncError::CalendarApi { .. })
        {
            error!(error = %self.0, kind = self.0.label(), "Request failed");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = json!({ "error": { "type": self.0.label(), "message": message } });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (StudySyncError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (StudySyncError::NotFound("chapter 99".into()), StatusCode::NOT_FOUND),
            (StudySyncError::Auth("login".into()), StatusCode::UNAUTHORIZED),
            (
                StudySyncError::CalendarApi { status: 403, message: "denied".into() },
                StatusCode::BAD_GATEWAY,
            ),
            (StudySyncError::Database("locked".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let response = ApiError(StudySyncError::Database("disk I/O error at /srv".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["message"], "internal server error");
        assert_eq!(body["error"]["type"], "database");
        assert!(!String::from_utf8_lossy(&bytes).contains("/srv"));
    }
}
