use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use igprofile_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{"error": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `igprofile_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::InvalidUsername(username) => {
                    tracing::debug!(username = %username, "Rejected invalid username");
                    (
                        StatusCode::BAD_REQUEST,
                        "Invalid Instagram username".to_string(),
                    )
                }
                CoreError::ProfileNotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "Instagram profile not found".to_string(),
                ),
                CoreError::Upstream { .. } => {
                    tracing::error!(error = %core, "Upstream provider failure");
                    (StatusCode::INTERNAL_SERVER_ERROR, core.to_string())
                }
                CoreError::Storage(msg) => {
                    tracing::error!(error = %msg, "Storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
