//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::warn;

use crate::render::{Landmark, LedCommand};

use super::dto::*;
use super::state::StatusState;

/// Create the status router.
pub fn create_router(state: StatusState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/lines", get(lines))
        .route("/leds", get(leds))
        .route("/landmarks", get(landmarks))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Per-line occupancy from the latest cycle.
async fn lines(State(state): State<StatusState>) -> Result<Json<LinesResponse>, AppError> {
    let report = state.latest().await.ok_or_else(AppError::not_ready)?;
    Ok(Json(LinesResponse::from(&report)))
}

/// The command list last sent to the controller.
async fn leds(State(state): State<StatusState>) -> Result<Json<Vec<LedCommand>>, AppError> {
    let report = state.latest().await.ok_or_else(AppError::not_ready)?;
    Ok(Json(report.commands))
}

/// Landmark positions resolved at startup.
async fn landmarks(State(state): State<StatusState>) -> Json<Vec<Landmark>> {
    Json(state.landmarks().all().to_vec())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Unavailable { message: String },
}

impl AppError {
    fn not_ready() -> Self {
        AppError::Unavailable {
            message: "no cycle has completed yet".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        warn!(%status, %message, "status request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
