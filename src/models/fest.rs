//! Fest model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::utils::json_fields::decode_string_list;

#[derive(Debug, Clone, FromRow)]
pub struct FestRow {
    pub id: String,
    pub fest_id: String,
    pub fest_title: String,
    pub description: Option<String>,
    pub opening_date: Option<NaiveDate>,
    pub closing_date: Option<NaiveDate>,
    pub fest_image_url: Option<String>,
    pub organizing_dept: Option<String>,
    pub department_access: Option<String>,
    pub category: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub event_heads: Option<String>,
    pub created_by: Option<String>,
    pub auth_uuid: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fest {
    pub id: String,
    pub fest_id: String,
    pub fest_title: String,
    pub description: Option<String>,
    pub opening_date: Option<NaiveDate>,
    pub closing_date: Option<NaiveDate>,
    pub fest_image_url: Option<String>,
    pub organizing_dept: Option<String>,
    pub department_access: Vec<String>,
    pub category: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub event_heads: Vec<String>,
    pub created_by: Option<String>,
    pub auth_uuid: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FestRow> for Fest {
    fn from(row: FestRow) -> Self {
        Self {
            department_access: decode_string_list(row.department_access.as_deref()),
            event_heads: decode_string_list(row.event_heads.as_deref()),
            id: row.id,
            fest_id: row.fest_id,
            fest_title: row.fest_title,
            description: row.description,
            opening_date: row.opening_date,
            closing_date: row.closing_date,
            fest_image_url: row.fest_image_url,
            organizing_dept: row.organizing_dept,
            category: row.category,
            contact_email: row.contact_email,
            contact_phone: row.contact_phone,
            created_by: row.created_by,
            auth_uuid: row.auth_uuid,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Editable fest fields. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FestDetails {
    pub fest_title: Option<String>,
    pub description: Option<String>,
    pub opening_date: Option<NaiveDate>,
    pub closing_date: Option<NaiveDate>,
    pub organizing_dept: Option<String>,
    pub department_access: Option<Vec<String>>,
    pub category: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub event_heads: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct CreateFestRequest {
    pub fest_id: String,
    pub fest_title: String,
    pub details: FestDetails,
    pub fest_image_url: Option<String>,
    pub created_by: String,
    pub auth_uuid: String,
}
