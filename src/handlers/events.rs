//! Event handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use crate::handlers::form::FormData;
use crate::models::event::EventDetails;
use crate::services::{AuthUser, EventUploads};
use crate::state::SharedState;
use crate::utils::errors::Result;

/// Read the editable event fields from a form. Absent or blank fields stay `None`.
pub fn event_details_from_form(form: &FormData) -> Result<EventDetails> {
    Ok(EventDetails {
        title: form.text("title"),
        description: form.text("description"),
        event_date: form.date("event_date")?,
        event_time: form.time("event_time")?,
        end_date: form.date("end_date")?,
        venue: form.text("venue"),
        category: form.text("category"),
        department_access: form.list("department_access"),
        claims_applicable: form.flag("claims_applicable"),
        registration_fee: form.float("registration_fee")?,
        participants_per_team: form.int("participants_per_team")?,
        max_participants: form.int("max_participants")?,
        rules: form.json("rules"),
        schedule: form.json("schedule"),
        prizes: form.json("prizes"),
        tags: form.list("tags"),
        organizer_email: form.text("organizer_email"),
        organizer_phone: form.text("organizer_phone"),
        whatsapp_invite_link: form.text("whatsapp_invite_link"),
        organizing_dept: form.text("organizing_dept"),
        fest: form.text("fest"),
        registration_deadline: form.datetime("registration_deadline")?,
    })
}

fn event_uploads_from_form(form: &mut FormData) -> EventUploads {
    EventUploads {
        image: form.take_file("imageFile"),
        banner: form.take_file("bannerFile"),
        pdf: form.take_file("pdfFile"),
    }
}

/// GET /api/events
pub async fn list_events(State(state): State<SharedState>) -> Result<impl IntoResponse> {
    let events = state.services.event_service.list().await?;
    Ok(Json(json!({ "events": events })))
}

/// GET /api/events/:eventId
pub async fn get_event(
    State(state): State<SharedState>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse> {
    let event = state.services.event_service.get(&event_id).await?;
    Ok(Json(json!({ "event": event })))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<SharedState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let organiser = state.organiser(&auth).await?;

    let mut form = FormData::from_multipart(multipart).await?;
    let details = event_details_from_form(&form)?;
    let uploads = event_uploads_from_form(&mut form);

    let event = state
        .services
        .event_service
        .create(&organiser, &auth, details, uploads)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Event created successfully",
            "event_id": event.event_id,
            "created_by": event.created_by,
        })),
    ))
}

/// PUT /api/events/:eventId
pub async fn update_event(
    State(state): State<SharedState>,
    Path(event_id): Path<String>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    state.organiser(&auth).await?;

    let mut form = FormData::from_multipart(multipart).await?;
    let details = event_details_from_form(&form)?;
    let uploads = event_uploads_from_form(&mut form);

    let event = state
        .services
        .event_service
        .update(&event_id, &auth, details, uploads)
        .await?;

    Ok(Json(json!({
        "message": "Event updated successfully",
        "event": event,
    })))
}

/// DELETE /api/events/:eventId
pub async fn delete_event(
    State(state): State<SharedState>,
    Path(event_id): Path<String>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let organiser = state.organiser(&auth).await?;
    let event = state.services.event_service.delete(&event_id, &auth).await?;

    Ok(Json(json!({
        "message": "Event deleted successfully",
        "event_id": event.event_id,
        "deleted_by": organiser.email,
    })))
}
