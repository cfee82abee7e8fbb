//! Event model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

use crate::utils::json_fields::{decode_column, decode_string_list};

/// Event as stored, JSON columns still encoded
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub department_access: Option<String>,
    pub claims_applicable: bool,
    pub registration_fee: Option<f64>,
    pub participants_per_team: Option<i32>,
    pub max_participants: Option<i32>,
    pub event_image_url: Option<String>,
    pub banner_url: Option<String>,
    pub pdf_url: Option<String>,
    pub rules: Option<String>,
    pub schedule: Option<String>,
    pub prizes: Option<String>,
    pub tags: Option<String>,
    pub organizer_email: Option<String>,
    pub organizer_phone: Option<String>,
    pub whatsapp_invite_link: Option<String>,
    pub organizing_dept: Option<String>,
    pub fest: Option<String>,
    pub created_by: Option<String>,
    pub auth_uuid: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub total_participants: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub department_access: Vec<String>,
    pub claims_applicable: bool,
    pub registration_fee: Option<f64>,
    pub participants_per_team: Option<i32>,
    pub max_participants: Option<i32>,
    pub event_image_url: Option<String>,
    pub banner_url: Option<String>,
    pub pdf_url: Option<String>,
    pub rules: Value,
    pub schedule: Value,
    pub prizes: Value,
    pub tags: Vec<String>,
    pub organizer_email: Option<String>,
    pub organizer_phone: Option<String>,
    pub whatsapp_invite_link: Option<String>,
    pub organizing_dept: Option<String>,
    pub fest: Option<String>,
    pub created_by: Option<String>,
    pub auth_uuid: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub total_participants: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            department_access: decode_string_list(row.department_access.as_deref()),
            rules: decode_column(row.rules.as_deref()),
            schedule: decode_column(row.schedule.as_deref()),
            prizes: decode_column(row.prizes.as_deref()),
            tags: decode_string_list(row.tags.as_deref()),
            id: row.id,
            event_id: row.event_id,
            title: row.title,
            description: row.description,
            event_date: row.event_date,
            event_time: row.event_time,
            end_date: row.end_date,
            venue: row.venue,
            category: row.category,
            claims_applicable: row.claims_applicable,
            registration_fee: row.registration_fee,
            participants_per_team: row.participants_per_team,
            max_participants: row.max_participants,
            event_image_url: row.event_image_url,
            banner_url: row.banner_url,
            pdf_url: row.pdf_url,
            organizer_email: row.organizer_email,
            organizer_phone: row.organizer_phone,
            whatsapp_invite_link: row.whatsapp_invite_link,
            organizing_dept: row.organizing_dept,
            fest: row.fest,
            created_by: row.created_by,
            auth_uuid: row.auth_uuid,
            registration_deadline: row.registration_deadline,
            total_participants: row.total_participants,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Editable event fields. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub category: Option<String>,
    pub department_access: Option<Vec<String>>,
    pub claims_applicable: Option<bool>,
    pub registration_fee: Option<f64>,
    pub participants_per_team: Option<i32>,
    pub max_participants: Option<i32>,
    pub rules: Option<Value>,
    pub schedule: Option<Value>,
    pub prizes: Option<Value>,
    pub tags: Option<Vec<String>>,
    pub organizer_email: Option<String>,
    pub organizer_phone: Option<String>,
    pub whatsapp_invite_link: Option<String>,
    pub organizing_dept: Option<String>,
    pub fest: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

/// Stored file URLs attached to an event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventAssets {
    pub event_image_url: Option<String>,
    pub banner_url: Option<String>,
    pub pdf_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateEventRequest {
    pub event_id: String,
    pub title: String,
    pub details: EventDetails,
    pub assets: EventAssets,
    pub created_by: String,
    pub auth_uuid: String,
}
