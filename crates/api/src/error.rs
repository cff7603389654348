use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use psj_core::error::CoreError;
use psj_core::submission::SubmissionError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`SubmissionError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `psj_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed report submission.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Submission(err) => return submission_response(err),

            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} {key} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a failed submission to its response. The message is the classified
/// user-facing text; persistence failures also report whether the report row
/// was rolled back.
fn submission_response(err: &SubmissionError) -> Response {
    let message = err.user_message();

    let (status, code) = match err {
        SubmissionError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        SubmissionError::CodeGeneration(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "CODE_GENERATION_FAILED")
        }
        SubmissionError::MediaEncoding(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "MEDIA_ENCODING_FAILED")
        }
        SubmissionError::Persistence { .. } => {
            tracing::error!(error = %err, "Report persistence failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_FAILED")
        }
    };

    let body = match err {
        SubmissionError::Persistence {
            compensation_attempted,
            ..
        } => json!({
            "error": message,
            "code": code,
            "compensated": compensation_attempted,
        }),
        _ => json!({
            "error": message,
            "code": code,
        }),
    };

    (status, axum::Json(body)).into_response()
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
