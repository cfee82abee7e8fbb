//! Fest repository implementation

use sqlx::MySqlPool;
use chrono::Utc;
use crate::models::fest::{Fest, FestRow, FestDetails, CreateFestRequest};
use crate::utils::errors::SocioError;
use crate::utils::helpers::generate_uuid;
use crate::utils::json_fields::encode_column;

const FEST_COLUMNS: &str = "id, fest_id, fest_title, description, opening_date, closing_date, fest_image_url, \
    organizing_dept, department_access, category, contact_email, contact_phone, event_heads, created_by, \
    auth_uuid, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct FestRepository {
    pool: MySqlPool,
}

impl FestRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a new fest
    pub async fn create(&self, request: CreateFestRequest) -> Result<Fest, SocioError> {
        let details = request.details;
        let department_access = encode_column(&details.department_access.unwrap_or_default())?;
        let event_heads = encode_column(&details.event_heads.unwrap_or_default())?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO fests (
                id, fest_id, fest_title, description, opening_date, closing_date, fest_image_url,
                organizing_dept, department_access, category, contact_email, contact_phone, event_heads,
                created_by, auth_uuid, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(generate_uuid())
        .bind(&request.fest_id)
        .bind(request.fest_title)
        .bind(details.description)
        .bind(details.opening_date)
        .bind(details.closing_date)
        .bind(request.fest_image_url)
        .bind(details.organizing_dept)
        .bind(department_access)
        .bind(details.category)
        .bind(details.contact_email)
        .bind(details.contact_phone)
        .bind(event_heads)
        .bind(request.created_by)
        .bind(request.auth_uuid)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_fest_id(&request.fest_id)
            .await?
            .map(Fest::from)
            .ok_or(SocioError::Database(sqlx::Error::RowNotFound))
    }

    /// Find fest by its public fest id
    pub async fn find_by_fest_id(&self, fest_id: &str) -> Result<Option<FestRow>, SocioError> {
        let fest = sqlx::query_as::<_, FestRow>(
            &format!("SELECT {} FROM fests WHERE fest_id = ?", FEST_COLUMNS)
        )
        .bind(fest_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(fest)
    }

    /// Update supplied fields of a fest
    pub async fn update(&self, fest_id: &str, details: FestDetails, fest_image_url: Option<String>) -> Result<Fest, SocioError> {
        let department_access = details.department_access.as_ref().map(encode_column).transpose()?;
        let event_heads = details.event_heads.as_ref().map(encode_column).transpose()?;

        sqlx::query(
            r#"
            UPDATE fests
            SET fest_title = COALESCE(?, fest_title),
                description = COALESCE(?, description),
                opening_date = COALESCE(?, opening_date),
                closing_date = COALESCE(?, closing_date),
                fest_image_url = COALESCE(?, fest_image_url),
                organizing_dept = COALESCE(?, organizing_dept),
                department_access = COALESCE(?, department_access),
                category = COALESCE(?, category),
                contact_email = COALESCE(?, contact_email),
                contact_phone = COALESCE(?, contact_phone),
                event_heads = COALESCE(?, event_heads),
                updated_at = ?
            WHERE fest_id = ?
            "#
        )
        .bind(details.fest_title)
        .bind(details.description)
        .bind(details.opening_date)
        .bind(details.closing_date)
        .bind(fest_image_url)
        .bind(details.organizing_dept)
        .bind(department_access)
        .bind(details.category)
        .bind(details.contact_email)
        .bind(details.contact_phone)
        .bind(event_heads)
        .bind(Utc::now())
        .bind(fest_id)
        .execute(&self.pool)
        .await?;

        self.find_by_fest_id(fest_id)
            .await?
            .map(Fest::from)
            .ok_or_else(|| SocioError::NotFound(format!("Fest with ID '{}' not found.", fest_id)))
    }

    /// Delete a fest. Events referencing it are kept.
    pub async fn delete(&self, fest_id: &str) -> Result<bool, SocioError> {
        let result = sqlx::query("DELETE FROM fests WHERE fest_id = ?")
            .bind(fest_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all fests, newest first
    pub async fn list(&self) -> Result<Vec<Fest>, SocioError> {
        let fests = sqlx::query_as::<_, FestRow>(
            &format!("SELECT {} FROM fests ORDER BY created_at DESC", FEST_COLUMNS)
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(fests.into_iter().map(Fest::from).collect())
    }
}
