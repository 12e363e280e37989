use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pictura_core::error::CoreError;
use pictura_openai::OpenAiError;
use pictura_replicate::{PollError, ReplicateApiError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, the vendor client errors, and adds
/// HTTP-specific variants. Every variant renders as
/// `{ "error": <message>, "code": <CODE> }`. Raw upstream and database
/// errors are logged, never returned.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// A vendor credential is not configured. Carries the env var name.
    #[error("Missing configuration: {0}")]
    MissingApiKey(&'static str),

    /// Submission to the image-generation vendor failed.
    #[error(transparent)]
    Replicate(#[from] ReplicateApiError),

    /// A submitted job did not produce output.
    #[error(transparent)]
    Generation(#[from] PollError),

    /// The prompt-enhancement call failed.
    #[error(transparent)]
    Enhancement(#[from] OpenAiError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::InsufficientTokens { .. } => (
                    StatusCode::CONFLICT,
                    "INSUFFICIENT_TOKENS",
                    core.to_string(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }

            // --- Vendor errors ---
            AppError::MissingApiKey(var) => {
                tracing::error!(variable = %var, "Vendor credential is not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "API configuration error".to_string(),
                )
            }
            AppError::Replicate(err) => classify_submission_error(err),
            AppError::Generation(err) => classify_poll_error(err),
            AppError::Enhancement(err) => {
                tracing::error!(error = %err, "Prompt enhancement failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    "Failed to enhance prompt".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
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
                INTERNAL_MESSAGE.to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

/// A rejected submission carries the vendor's `detail` text when it sent
/// one; otherwise the status code is reported.
fn classify_submission_error(err: &ReplicateApiError) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %err, "Image generation submission failed");
    let message = match err {
        ReplicateApiError::ApiError {
            detail: Some(detail),
            ..
        } => detail.clone(),
        ReplicateApiError::ApiError { status, .. } => {
            format!("Failed to generate image. Status: {status}")
        }
        ReplicateApiError::Request(_) => "Failed to generate image".to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR", message)
}

fn classify_poll_error(err: &PollError) -> (StatusCode, &'static str, String) {
    match err {
        PollError::Failed { message, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "GENERATION_FAILED",
            message.clone(),
        ),
        PollError::TimedOut { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "GENERATION_TIMEOUT",
            "Image generation timed out".to_string(),
        ),
        PollError::Cancelled { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "GENERATION_CANCELLED",
            "Image generation was cancelled".to_string(),
        ),
        PollError::Fetch { .. } => {
            tracing::error!(error = %err, "Generation status check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_ERROR",
                "Failed to check image generation status".to_string(),
            )
        }
    }
}
