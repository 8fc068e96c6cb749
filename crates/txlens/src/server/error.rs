use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use txlens_core::CoreError;

// ==============================================================================
// Error Type
// ==============================================================================

#[derive(Debug)]
pub(crate) enum AppError {
    BadRequest(String),
    NotFound(String),
    Unprocessable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidHex(_) | CoreError::Decode(_) => Self::BadRequest(err.to_string()),
            CoreError::ParentLookup { .. } => Self::Unprocessable(err.to_string()),
            CoreError::InvalidNetwork(_) => Self::NotFound(err.to_string()),
        }
    }
}
