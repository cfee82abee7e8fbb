//! Notification handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use crate::handlers::json::ApiJson;
use crate::models::notification::{BulkNotificationRequest, CreateNotificationRequest};
use crate::services::AuthUser;
use crate::state::SharedState;
use crate::utils::errors::{SocioError, Result};

fn recipient(auth: &AuthUser) -> Result<&str> {
    auth.email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| SocioError::Authentication("Token carries no email address".to_string()))
}

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let notifications = state.services.notification_service.inbox(recipient(&auth)?).await?;
    Ok(Json(json!({ "notifications": notifications })))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    state.services.notification_service.mark_read(&id, recipient(&auth)?).await?;
    Ok(Json(json!({ "message": "Notification marked as read" })))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let updated = state.services.notification_service.mark_all_read(recipient(&auth)?).await?;

    Ok(Json(json!({
        "message": "All notifications marked as read",
        "updated_count": updated,
    })))
}

/// DELETE /api/notifications/:id
pub async fn delete_notification(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    state.services.notification_service.delete(&id, recipient(&auth)?).await?;
    Ok(Json(json!({ "message": "Notification deleted" })))
}

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<SharedState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<CreateNotificationRequest>,
) -> Result<impl IntoResponse> {
    state.organiser(&auth).await?;
    let notification = state.services.notification_service.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Notification created successfully",
            "notification": notification,
        })),
    ))
}

/// POST /api/notifications/bulk
pub async fn create_bulk_notifications(
    State(state): State<SharedState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<BulkNotificationRequest>,
) -> Result<impl IntoResponse> {
    state.organiser(&auth).await?;
    let created = state.services.notification_service.create_bulk(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Successfully created {} notifications", created),
            "count": created,
        })),
    ))
}
