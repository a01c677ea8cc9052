//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::CredentialError;
use crate::domain::ValidationError;
use crate::repository::{Conflict, RepoError};

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Query parameter 'month' is required (YYYY-MM)")]
    MonthRequired,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Category not found")]
    CategoryNotFound,

    #[error("{}", .0.message)]
    Conflict(Conflict),

    // Server errors (5xx)
    #[error("Request identity missing")]
    IdentityMissing,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// HTTP status and stable error code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest(_) | AppError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request")
            }
            AppError::MonthRequired => (StatusCode::BAD_REQUEST, "month_required"),

            // 401 Unauthorized
            AppError::MissingToken | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "unauthorized")
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),

            // 404 Not Found
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::CategoryNotFound => (StatusCode::NOT_FOUND, "category_not_found"),

            // 409 Conflict
            AppError::Conflict(conflict) => (StatusCode::CONFLICT, conflict.code),

            // 500 Internal Server Error
            AppError::IdentityMissing | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let details = match &self {
            AppError::InvalidRequest(msg) => Some(msg.clone()),
            AppError::Validation(err) => Some(err.to_string()),
            AppError::Conflict(conflict) => Some(conflict.kind.to_string()),
            AppError::IdentityMissing => {
                tracing::error!("Principal missing on an authenticated route");
                None
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                None
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                None
            }
            other => {
                tracing::debug!(error_code, "Request rejected: {}", other);
                None
            }
        };

        // Server-side failures never leak their cause to the client
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Conflict(conflict) => AppError::Conflict(conflict),
            RepoError::MissingReference(_) => AppError::CategoryNotFound,
            RepoError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidToken => AppError::InvalidToken,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AmountError;
    use http_body_util::BodyExt;
    use rust_decimal::Decimal;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST, "invalid_request"),
            (AppError::MonthRequired, StatusCode::BAD_REQUEST, "month_required"),
            (AppError::MissingToken, StatusCode::UNAUTHORIZED, "unauthorized"),
            (AppError::InvalidToken, StatusCode::UNAUTHORIZED, "unauthorized"),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED, "invalid_credentials"),
            (AppError::NotFound("Budget"), StatusCode::NOT_FOUND, "not_found"),
            (AppError::CategoryNotFound, StatusCode::NOT_FOUND, "category_not_found"),
            (AppError::IdentityMissing, StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            (
                AppError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code), "{err:?}");
        }
    }

    #[test]
    fn test_repo_error_conversion() {
        let conflict = Conflict::dependent_row("category_has_budgets", "Category is used by budgets");
        let err: AppError = RepoError::Conflict(conflict).into();
        assert_eq!(
            err.status_and_code(),
            (StatusCode::CONFLICT, "category_has_budgets")
        );

        let err: AppError = RepoError::MissingReference("category").into();
        assert!(matches!(err, AppError::CategoryNotFound));

        let err: AppError = RepoError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_credential_error_conversion() {
        let err: AppError = CredentialError::InvalidToken.into();
        assert!(matches!(err, AppError::InvalidToken));

        let err: AppError = CredentialError::NonPositiveTtl.into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_validation_body_carries_details() {
        let err = AppError::from(ValidationError::InvalidAmount(AmountError::NotPositive(
            Decimal::ZERO,
        )));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "invalid_request");
        assert!(body["details"].as_str().unwrap().contains("positive"));
    }

    #[tokio::test]
    async fn test_conflict_body() {
        let err = AppError::Conflict(Conflict::duplicate(
            "email_in_use",
            "Email is already registered",
        ));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email is already registered");
        assert_eq!(body["error_code"], "email_in_use");
        assert_eq!(body["details"], "duplicate");
    }

    #[tokio::test]
    async fn test_server_error_hides_cause() {
        let (status, body) = body_json(AppError::Internal("pool exploded".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("details").is_none());
    }
}
