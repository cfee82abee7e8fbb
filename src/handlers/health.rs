//! Health check handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::state::SharedState;

/// GET /health
pub async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    let status = state.services.health_check(&state.db).await;
    let code = if status.is_healthy() { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (
        code,
        Json(json!({
            "status": if status.is_healthy() { "ok" } else { "degraded" },
            "checks": status,
            "issues": status.get_issues(),
        })),
    )
}
