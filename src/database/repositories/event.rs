//! Event repository implementation

use sqlx::MySqlPool;
use chrono::Utc;
use crate::models::event::{Event, EventRow, EventDetails, EventAssets, CreateEventRequest};
use crate::utils::errors::SocioError;
use crate::utils::helpers::generate_uuid;
use crate::utils::json_fields::encode_column;

const EVENT_COLUMNS: &str = "id, event_id, title, description, event_date, event_time, end_date, venue, category, \
    department_access, claims_applicable, registration_fee, participants_per_team, max_participants, \
    event_image_url, banner_url, pdf_url, rules, schedule, prizes, tags, organizer_email, organizer_phone, \
    whatsapp_invite_link, organizing_dept, fest, created_by, auth_uuid, registration_deadline, \
    total_participants, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: MySqlPool,
}

/// JSON columns encoded for binding; `None` leaves the column untouched on update
struct EncodedJson {
    department_access: Option<String>,
    rules: Option<String>,
    schedule: Option<String>,
    prizes: Option<String>,
    tags: Option<String>,
}

impl EncodedJson {
    fn from_details(details: &EventDetails) -> Result<Self, SocioError> {
        Ok(Self {
            department_access: details.department_access.as_ref().map(encode_column).transpose()?,
            rules: details.rules.as_ref().map(encode_column).transpose()?,
            schedule: details.schedule.as_ref().map(encode_column).transpose()?,
            prizes: details.prizes.as_ref().map(encode_column).transpose()?,
            tags: details.tags.as_ref().map(encode_column).transpose()?,
        })
    }
}

impl EventRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, SocioError> {
        let json = EncodedJson::from_details(&request.details)?;
        let details = request.details;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO events (
                id, event_id, title, description, event_date, event_time, end_date, venue, category,
                department_access, claims_applicable, registration_fee, participants_per_team, max_participants,
                event_image_url, banner_url, pdf_url, rules, schedule, prizes, tags,
                organizer_email, organizer_phone, whatsapp_invite_link, organizing_dept, fest,
                created_by, auth_uuid, registration_deadline, total_participants, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            "#
        )
        .bind(generate_uuid())
        .bind(&request.event_id)
        .bind(request.title)
        .bind(details.description)
        .bind(details.event_date)
        .bind(details.event_time)
        .bind(details.end_date)
        .bind(details.venue)
        .bind(details.category)
        .bind(json.department_access.unwrap_or_else(|| "[]".to_string()))
        .bind(details.claims_applicable.unwrap_or(false))
        .bind(details.registration_fee)
        .bind(details.participants_per_team)
        .bind(details.max_participants)
        .bind(request.assets.event_image_url)
        .bind(request.assets.banner_url)
        .bind(request.assets.pdf_url)
        .bind(json.rules.unwrap_or_else(|| "[]".to_string()))
        .bind(json.schedule.unwrap_or_else(|| "[]".to_string()))
        .bind(json.prizes.unwrap_or_else(|| "[]".to_string()))
        .bind(json.tags.unwrap_or_else(|| "[]".to_string()))
        .bind(details.organizer_email)
        .bind(details.organizer_phone)
        .bind(details.whatsapp_invite_link)
        .bind(details.organizing_dept)
        .bind(details.fest)
        .bind(request.created_by)
        .bind(request.auth_uuid)
        .bind(details.registration_deadline)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_event_id(&request.event_id)
            .await?
            .map(Event::from)
            .ok_or(SocioError::Database(sqlx::Error::RowNotFound))
    }

    /// Find event by its public event id
    pub async fn find_by_event_id(&self, event_id: &str) -> Result<Option<EventRow>, SocioError> {
        let event = sqlx::query_as::<_, EventRow>(
            &format!("SELECT {} FROM events WHERE event_id = ?", EVENT_COLUMNS)
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Check whether an event exists
    pub async fn exists(&self, event_id: &str) -> Result<bool, SocioError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE event_id = ?")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    /// Update supplied fields of an event
    pub async fn update(&self, event_id: &str, details: EventDetails, assets: EventAssets) -> Result<Event, SocioError> {
        let json = EncodedJson::from_details(&details)?;

        sqlx::query(
            r#"
            UPDATE events
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                event_date = COALESCE(?, event_date),
                event_time = COALESCE(?, event_time),
                end_date = COALESCE(?, end_date),
                venue = COALESCE(?, venue),
                category = COALESCE(?, category),
                department_access = COALESCE(?, department_access),
                claims_applicable = COALESCE(?, claims_applicable),
                registration_fee = COALESCE(?, registration_fee),
                participants_per_team = COALESCE(?, participants_per_team),
                max_participants = COALESCE(?, max_participants),
                event_image_url = COALESCE(?, event_image_url),
                banner_url = COALESCE(?, banner_url),
                pdf_url = COALESCE(?, pdf_url),
                rules = COALESCE(?, rules),
                schedule = COALESCE(?, schedule),
                prizes = COALESCE(?, prizes),
                tags = COALESCE(?, tags),
                organizer_email = COALESCE(?, organizer_email),
                organizer_phone = COALESCE(?, organizer_phone),
                whatsapp_invite_link = COALESCE(?, whatsapp_invite_link),
                organizing_dept = COALESCE(?, organizing_dept),
                fest = COALESCE(?, fest),
                registration_deadline = COALESCE(?, registration_deadline),
                updated_at = ?
            WHERE event_id = ?
            "#
        )
        .bind(details.title)
        .bind(details.description)
        .bind(details.event_date)
        .bind(details.event_time)
        .bind(details.end_date)
        .bind(details.venue)
        .bind(details.category)
        .bind(json.department_access)
        .bind(details.claims_applicable)
        .bind(details.registration_fee)
        .bind(details.participants_per_team)
        .bind(details.max_participants)
        .bind(assets.event_image_url)
        .bind(assets.banner_url)
        .bind(assets.pdf_url)
        .bind(json.rules)
        .bind(json.schedule)
        .bind(json.prizes)
        .bind(json.tags)
        .bind(details.organizer_email)
        .bind(details.organizer_phone)
        .bind(details.whatsapp_invite_link)
        .bind(details.organizing_dept)
        .bind(details.fest)
        .bind(details.registration_deadline)
        .bind(Utc::now())
        .bind(event_id)
        .execute(&self.pool)
        .await?;

        self.find_by_event_id(event_id)
            .await?
            .map(Event::from)
            .ok_or_else(|| SocioError::NotFound(format!("Event with ID '{}' not found.", event_id)))
    }

    /// Delete an event together with its registrations and attendance rows
    pub async fn delete_cascade(&self, event_id: &str) -> Result<bool, SocioError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM attendance_status WHERE event_id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM registrations WHERE event_id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM events WHERE event_id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all events, newest first
    pub async fn list(&self) -> Result<Vec<Event>, SocioError> {
        let events = sqlx::query_as::<_, EventRow>(
            &format!("SELECT {} FROM events ORDER BY created_at DESC", EVENT_COLUMNS)
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events.into_iter().map(Event::from).collect())
    }

    /// List events belonging to a fest
    pub async fn list_by_fest(&self, fest: &str) -> Result<Vec<Event>, SocioError> {
        let events = sqlx::query_as::<_, EventRow>(
            &format!("SELECT {} FROM events WHERE fest = ? ORDER BY event_date ASC", EVENT_COLUMNS)
        )
        .bind(fest)
        .fetch_all(&self.pool)
        .await?;

        Ok(events.into_iter().map(Event::from).collect())
    }
}
