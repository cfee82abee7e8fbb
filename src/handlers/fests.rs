//! Fest handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use crate::handlers::form::FormData;
use crate::models::fest::FestDetails;
use crate::services::AuthUser;
use crate::state::SharedState;
use crate::utils::errors::Result;

pub fn fest_details_from_form(form: &FormData) -> Result<FestDetails> {
    Ok(FestDetails {
        fest_title: form.text("fest_title"),
        description: form.text("description"),
        opening_date: form.date("opening_date")?,
        closing_date: form.date("closing_date")?,
        organizing_dept: form.text("organizing_dept"),
        department_access: form.list("department_access"),
        category: form.text("category"),
        contact_email: form.text("contact_email"),
        contact_phone: form.text("contact_phone"),
        event_heads: form.list("event_heads"),
    })
}

/// GET /api/fests
pub async fn list_fests(State(state): State<SharedState>) -> Result<impl IntoResponse> {
    let fests = state.services.fest_service.list().await?;
    Ok(Json(json!({ "fests": fests })))
}

/// GET /api/fests/:festId
pub async fn get_fest(
    State(state): State<SharedState>,
    Path(fest_id): Path<String>,
) -> Result<impl IntoResponse> {
    let fest = state.services.fest_service.get(&fest_id).await?;
    Ok(Json(json!({ "fest": fest })))
}

/// GET /api/fests/:festId/events
pub async fn list_fest_events(
    State(state): State<SharedState>,
    Path(fest_id): Path<String>,
) -> Result<impl IntoResponse> {
    let events = state.services.fest_service.events(&fest_id).await?;
    Ok(Json(json!({ "events": events })))
}

/// POST /api/fests
pub async fn create_fest(
    State(state): State<SharedState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let organiser = state.organiser(&auth).await?;

    let mut form = FormData::from_multipart(multipart).await?;
    let details = fest_details_from_form(&form)?;
    let image = form.take_file("imageFile");

    let fest = state
        .services
        .fest_service
        .create(&organiser, &auth, details, image)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Fest created successfully",
            "fest_id": fest.fest_id,
            "created_by": fest.created_by,
        })),
    ))
}

/// PUT /api/fests/:festId
pub async fn update_fest(
    State(state): State<SharedState>,
    Path(fest_id): Path<String>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    state.organiser(&auth).await?;

    let mut form = FormData::from_multipart(multipart).await?;
    let details = fest_details_from_form(&form)?;
    let image = form.take_file("imageFile");

    let fest = state
        .services
        .fest_service
        .update(&fest_id, &auth, details, image)
        .await?;

    Ok(Json(json!({
        "message": "Fest updated successfully",
        "fest": fest,
    })))
}

/// DELETE /api/fests/:festId
pub async fn delete_fest(
    State(state): State<SharedState>,
    Path(fest_id): Path<String>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let organiser = state.organiser(&auth).await?;
    let fest = state.services.fest_service.delete(&fest_id, &auth).await?;

    Ok(Json(json!({
        "message": "Fest deleted successfully",
        "fest_id": fest.fest_id,
        "deleted_by": organiser.email,
    })))
}
