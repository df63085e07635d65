//! Unified error handling.
//!
//! Every handler returns `Result<T, ApiError>`; the `IntoResponse`
//! implementation converts each failure into its status code and a JSON
//! body. Internal detail (queries, stack traces) is logged server-side and
//! never returned to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::FieldIssue;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input, reported per field.
    #[error("validation failed")]
    Validation(Vec<FieldIssue>),

    /// Request body could not be parsed at all.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No valid session.
    #[error("authentication required")]
    AuthRequired,

    /// Valid session, insufficient role.
    #[error("forbidden")]
    Forbidden,

    /// Referenced entity absent or not visible to the caller.
    #[error("not found")]
    NotFound,

    /// Uniqueness violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Credentials did not match. Deliberately generic: the same failure
    /// covers an unknown email and a wrong password, to prevent account
    /// enumeration.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Unexpected store or codec failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::EmailTaken => Self::Conflict("email already registered".to_owned()),
            AuthError::PasswordHash(msg) => Self::Internal(msg),
            AuthError::Repository(repo) => repo.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AuthRequired | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Log server errors with full detail; the client gets a generic body.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let body = match &self {
            Self::Validation(issues) => json!({
                "error": "validation failed",
                "issues": issues,
            }),
            Self::Internal(_) => json!({ "error": "internal server error" }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(ApiError::Validation(vec![])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApiError::AuthRequired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ApiError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(ApiError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ApiError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ApiError::Conflict("x".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        assert_eq!(
            status_of(RepositoryError::Conflict("email".to_owned()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(RepositoryError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RepositoryError::DataCorruption("bad".to_owned()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let response =
            ApiError::Internal("SELECT secret FROM users failed".to_owned()).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "internal server error");
    }

    #[tokio::test]
    async fn test_validation_body_carries_issues() {
        let err = ApiError::Validation(vec![FieldIssue {
            field: "name",
            message: "too short".to_owned(),
        }]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["issues"][0]["field"], "name");
    }
}
