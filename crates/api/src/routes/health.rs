use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Payload of `GET /` and `GET /ping`.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /
async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to DulProMax API!",
    })
}

/// GET /ping
async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse { message: "pong" })
}

/// GET /health -- static liveness payload; does not touch the datastore.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "dulpromax-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Mount the informational routes at the root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/ping", get(ping))
        .route("/health", get(health_check))
}
