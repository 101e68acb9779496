use axum::{Json, extract::State};
use chrono::Utc;

use crate::{AppState, config::Env, models::HealthResponse};

// Handlers grouped by the resource family they serve.
pub mod auth;
pub mod content;
pub mod settings;
pub mod upload;

/// health
///
/// [Public Route] Liveness endpoint used by uptime monitors and the
/// frontend's API health banner.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        environment: match state.config.env {
            Env::Local => "development".to_string(),
            Env::Production => "production".to_string(),
        },
    })
}
