//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::engine::error::ScheduleError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Structured details: conflict findings, capacity violations, or
    /// generation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request shape, before any domain check
    BadRequest(String),
    /// Domain rejection from the scheduling engine or services
    Schedule(ScheduleError),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Schedule(err) => schedule_error_response(err),
        };

        (status, Json(error)).into_response()
    }
}

/// Map a domain rejection to a status and body.
///
/// Validation errors are the caller's input shape (400). Conflicts, state
/// violations, and failed publication are clashes with current server state
/// (409). Capacity violations are well-formed but unprocessable (422).
fn schedule_error_response(err: ScheduleError) -> (StatusCode, ApiError) {
    let code = err.code();
    match err {
        ScheduleError::Validation(_) => (StatusCode::BAD_REQUEST, ApiError::new(code, err.to_string())),
        ScheduleError::Conflict { ref findings } => {
            let details = serde_json::to_value(findings).unwrap_or_default();
            (
                StatusCode::CONFLICT,
                ApiError::new(code, err.to_string()).with_details(details),
            )
        }
        ScheduleError::Capacity(ref violation) => {
            let details = serde_json::to_value(violation).unwrap_or_default();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new(code, err.to_string()).with_details(details),
            )
        }
        ScheduleError::State(_) => (StatusCode::CONFLICT, ApiError::new(code, err.to_string())),
        ScheduleError::Generation { ref failures } => {
            let details = serde_json::to_value(failures).unwrap_or_default();
            (
                StatusCode::CONFLICT,
                ApiError::new(code, err.to_string()).with_details(details),
            )
        }
        ScheduleError::Repository(ref repo_err) => {
            if repo_err.is_not_found() {
                (
                    StatusCode::NOT_FOUND,
                    ApiError::new("NOT_FOUND", err.to_string()),
                )
            } else if matches!(repo_err, RepositoryError::ValidationError(_)) {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ApiError::new("VALIDATION_ERROR", err.to_string()),
                )
            } else {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new(code, err.to_string()),
                )
            }
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::Schedule(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Schedule(ScheduleError::Repository(err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PeriodId;
    use crate::engine::error::StateError;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::from(RepositoryError::NotFound("period 7 not found".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_published_batch_maps_to_409() {
        let err = AppError::from(ScheduleError::State(StateError::BatchPublished {
            period: PeriodId::new(1),
        }));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_conflict_body_carries_code() {
        let (status, body) = schedule_error_response(ScheduleError::Conflict { findings: vec![] });
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "SCHEDULE_CONFLICT");
        assert!(body.details.is_some());
    }
}
