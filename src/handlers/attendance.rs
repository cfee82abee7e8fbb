//! Attendance handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use crate::handlers::json::ApiJson;
use crate::models::attendance::{MarkAttendanceRequest, ScanRequest};
use crate::services::AuthUser;
use crate::state::SharedState;
use crate::utils::errors::Result;

/// GET /api/events/:eventId/participants
pub async fn list_participants(
    State(state): State<SharedState>,
    Path(event_id): Path<String>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let (event, participants) = state
        .services
        .attendance_service
        .participants(&event_id, &auth)
        .await?;

    Ok(Json(json!({
        "event": { "title": event.title },
        "participants": participants,
    })))
}

/// POST /api/events/:eventId/attendance
pub async fn mark_attendance(
    State(state): State<SharedState>,
    Path(event_id): Path<String>,
    auth: AuthUser,
    ApiJson(request): ApiJson<MarkAttendanceRequest>,
) -> Result<impl IntoResponse> {
    let updated = state
        .services
        .attendance_service
        .mark(&event_id, &auth, request)
        .await?;

    Ok(Json(json!({
        "message": format!("Attendance updated for {} participants", updated),
        "updated_count": updated,
    })))
}

/// GET /api/events/:eventId/attendance/stats
pub async fn attendance_stats(
    State(state): State<SharedState>,
    Path(event_id): Path<String>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let stats = state.services.attendance_service.stats(&event_id, &auth).await?;
    Ok(Json(json!({ "stats": stats })))
}

/// POST /api/events/:eventId/scan
pub async fn scan_qr(
    State(state): State<SharedState>,
    Path(event_id): Path<String>,
    auth: AuthUser,
    ApiJson(request): ApiJson<ScanRequest>,
) -> Result<impl IntoResponse> {
    let outcome = state
        .services
        .attendance_service
        .scan(&event_id, &auth, request)
        .await?;

    Ok(Json(json!({
        "message": "Attendance marked",
        "registration_id": outcome.registration_id,
        "participant": outcome.participant,
    })))
}

/// GET /api/events/:eventId/scan-logs
pub async fn scan_logs(
    State(state): State<SharedState>,
    Path(event_id): Path<String>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let logs = state.services.attendance_service.scan_logs(&event_id, &auth).await?;
    Ok(Json(json!({ "logs": logs })))
}
