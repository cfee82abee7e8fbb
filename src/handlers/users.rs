//! User handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use crate::handlers::json::ApiJson;
use crate::models::user::SyncUserRequest;
use crate::state::SharedState;
use crate::utils::errors::Result;

/// GET /api/users
pub async fn list_users(State(state): State<SharedState>) -> Result<impl IntoResponse> {
    let users = state.services.user_service.list_users().await?;
    Ok(Json(json!({ "users": users })))
}

/// GET /api/users/:email
pub async fn get_user(
    State(state): State<SharedState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state.services.user_service.get_user_by_email(&email).await?;
    Ok(Json(json!({ "user": user })))
}

/// POST /api/users
pub async fn sync_user(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<SyncUserRequest>,
) -> Result<impl IntoResponse> {
    let outcome = state.services.user_service.sync_user(request).await?;
    let status = if outcome.is_new { StatusCode::CREATED } else { StatusCode::OK };

    Ok((
        status,
        Json(json!({
            "user": outcome.user,
            "isNew": outcome.is_new,
            "message": outcome.message,
        })),
    ))
}
