//! JSON body extractor with the API's error shape.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::AppError;

/// Drop-in for [`axum::Json`] as a handler argument.
///
/// A body that is missing, malformed, or of the wrong shape is rejected as
/// `400 { "error", "code": "BAD_REQUEST" }` instead of axum's plain-text
/// response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
