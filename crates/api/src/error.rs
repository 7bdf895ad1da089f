use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dulpromax_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Handlers and stores report failures as [`CoreError`]; this wrapper owns
/// the mapping to status codes and the `{"error", "code"}` JSON body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `dulpromax_core` or a store.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Core(core) = self;
        let (status, code, message) = match core {
            CoreError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            // Duplicate slugs/SKUs and referenced-on-delete are client
            // mistakes, reported as 400 rather than 409.
            CoreError::Conflict(msg) => (StatusCode::BAD_REQUEST, "CONFLICT", msg),
            CoreError::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    format!("Datastore error: {msg}"),
                )
            }
            CoreError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
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
