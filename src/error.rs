use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Boundary error taxonomy. Every handler failure is one of these; the
/// response body is the `{status: false, error}` envelope.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing request fields. Rejected before any mutation.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Scope/type/time collision with an existing boost.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Missing, invalid, or wrong-role bearer token.
    #[error("Unauthorized: {0}")]
    Auth(String),
    /// Unknown id, or an id not owned by the caller.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A debit would take the wallet balance negative.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    /// Storage or timeout failure. Retryable; surfaced generically.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<crate::db::repo::wallet::LedgerError> for AppError {
    fn from(err: crate::db::repo::wallet::LedgerError) -> Self {
        use crate::db::repo::wallet::LedgerError;
        match err {
            LedgerError::InsufficientFunds { .. } => AppError::InsufficientFunds(err.to_string()),
            LedgerError::Db(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<crate::catalog::CatalogError> for AppError {
    fn from(err: crate::catalog::CatalogError) -> Self {
        use crate::catalog::CatalogError;
        match err {
            CatalogError::Missing(_) => AppError::Validation(err.to_string()),
            CatalogError::Db(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientFunds(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details are logged, not leaked to the caller.
        let message = match &self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "status": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
