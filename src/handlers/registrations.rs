//! Registration handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use crate::handlers::json::ApiJson;
use crate::models::registration::CreateRegistrationRequest;
use crate::state::SharedState;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct RegistrationQuery {
    pub event_id: Option<String>,
}

/// GET /api/registrations?event_id=
pub async fn list_registrations(
    State(state): State<SharedState>,
    Query(query): Query<RegistrationQuery>,
) -> Result<impl IntoResponse> {
    let registrations = state
        .services
        .registration_service
        .list_for_event(query.event_id.as_deref())
        .await?;

    Ok(Json(json!({
        "count": registrations.len(),
        "registrations": registrations,
    })))
}

/// POST /api/register
pub async fn register(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<CreateRegistrationRequest>,
) -> Result<impl IntoResponse> {
    let registration = state.services.registration_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful",
            "registration": registration,
        })),
    ))
}

/// GET /api/registrations/:registrationId
pub async fn get_registration(
    State(state): State<SharedState>,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse> {
    let registration = state.services.registration_service.get(&registration_id).await?;
    Ok(Json(json!({ "registration": registration })))
}

/// GET /api/registrations/:registrationId/qr-code
pub async fn get_registration_qr(
    State(state): State<SharedState>,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse> {
    let qr = state.services.registration_service.qr_code(&registration_id).await?;

    Ok(Json(json!({
        "qrCodeImage": qr.image,
        "eventId": qr.event_id,
    })))
}

/// DELETE /api/registrations/:registrationId
pub async fn delete_registration(
    State(state): State<SharedState>,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse> {
    let removed = state.services.registration_service.delete(&registration_id).await?;

    Ok(Json(json!({
        "message": "Registration deleted successfully",
        "registration_id": removed.registration_id,
    })))
}
