//! Mapping of pipeline errors onto HTTP responses.

use analyzer_core::pipeline::AnalyzeError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Wrapper so pipeline errors can be returned straight from handlers.
///
/// Validation-class errors surface their message with a 400; anything
/// internal is logged and collapsed into an opaque 500.
pub struct ApiError(pub AnalyzeError);

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AnalyzeError::Internal(err) => {
                error!(error = ?err, "analysis request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            }
            user_error => (StatusCode::BAD_REQUEST, user_error.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
