//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use studysync_common::auth::OAuthClientError;
use studysync_common::storage::StorageError;
use studysync_domain::StudySyncError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub StudySyncError);

impl From<InfraError> for StudySyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<StudySyncError> for InfraError {
    fn from(value: StudySyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoStudySyncError {
    fn into_studysync(self) -> StudySyncError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → StudySyncError */
/* -------------------------------------------------------------------------- */

impl IntoStudySyncError for SqlError {
    fn into_studysync(self) -> StudySyncError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        StudySyncError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        StudySyncError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067 | 1555) => {
                        StudySyncError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        StudySyncError::Database("foreign key constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 275) => {
                        StudySyncError::Database(format!("check constraint violation: {message}"))
                    }
                    _ => StudySyncError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => StudySyncError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                StudySyncError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::IntegralValueOutOfRange(column, value) => StudySyncError::Database(format!(
                "integer {value} out of range for column {column}"
            )),
            RE::InvalidColumnType(_, _, ty) => {
                StudySyncError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => StudySyncError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => StudySyncError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_studysync())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → StudySyncError */
/* -------------------------------------------------------------------------- */

impl IntoStudySyncError for StorageError {
    fn into_studysync(self) -> StudySyncError {
        match self {
            StorageError::Rusqlite(err) => err.into_studysync(),
            StorageError::Timeout(secs) => {
                StudySyncError::Database(format!("no database connection available after {secs}s"))
            }
            StorageError::InvalidConfig(message) => StudySyncError::Config(message),
            other => StudySyncError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_studysync())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → StudySyncError */
/* -------------------------------------------------------------------------- */

// The calendar provider is the only HTTP peer, so transport failures surface
// as `CalendarApi` with status 0.
impl IntoStudySyncError for HttpError {
    fn into_studysync(self) -> StudySyncError {
        if let Some(status) = self.status() {
            return StudySyncError::CalendarApi {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        let message = if self.is_timeout() {
            "HTTP request timed out".to_string()
        } else if self.is_connect() {
            "HTTP connection failure".to_string()
        } else if self.is_builder() {
            return StudySyncError::Internal(format!("invalid HTTP request: {self}"));
        } else {
            self.to_string()
        };

        StudySyncError::CalendarApi { status: 0, message }
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_studysync())
    }
}

/* -------------------------------------------------------------------------- */
/* OAuthClientError → StudySyncError */
/* -------------------------------------------------------------------------- */

impl IntoStudySyncError for OAuthClientError {
    fn into_studysync(self) -> StudySyncError {
        match self {
            OAuthClientError::OAuth(error) => StudySyncError::Auth(error.to_string()),
            OAuthClientError::UnexpectedStatus { status, .. } => {
                StudySyncError::Auth(format!("token endpoint returned HTTP {status}"))
            }
            OAuthClientError::RequestFailed(err) => {
                StudySyncError::Auth(format!("token request failed: {err}"))
            }
            OAuthClientError::Parse(message) => {
                StudySyncError::Auth(format!("unreadable token response: {message}"))
            }
        }
    }
}

impl From<OAuthClientError> for InfraError {
    fn from(value: OAuthClientError) -> Self {
        InfraError(value.into_studysync())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → StudySyncError */
/* -------------------------------------------------------------------------- */

impl From<JoinError> for InfraError {
    fn from(err: JoinError) -> Self {
        if err.is_cancelled() {
            InfraError(StudySyncError::Internal("blocking task cancelled".into()))
        } else {
            InfraError(StudySyncError::Internal(format!("blocking task failed: {err}")))
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
