//! Notification repository implementation

use sqlx::MySqlPool;
use chrono::Utc;
use crate::models::notification::{NewNotification, Notification};
use crate::utils::errors::SocioError;
use crate::utils::helpers::generate_uuid;

const NOTIFICATION_COLUMNS: &str = r#"
    id, title, message, type, event_id, event_title, action_url,
    recipient_email, is_read, read_at, created_at
"#;

#[derive(Clone, Debug)]
pub struct NotificationRepository {
    pool: MySqlPool,
}

impl NotificationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a notification for one recipient
    pub async fn create(&self, notification: &NewNotification, recipient_email: &str) -> Result<Notification, SocioError> {
        let id = generate_uuid();
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, &id, notification, recipient_email).await?;

        self.find_by_id(&id).await?
            .ok_or_else(|| SocioError::NotFound(format!("Notification '{}' not found after insert", id)))
    }

    /// Create the same notification for each recipient in one transaction
    pub async fn create_bulk(&self, notification: &NewNotification, recipients: &[String]) -> Result<usize, SocioError> {
        let mut tx = self.pool.begin().await?;

        for recipient in recipients {
            insert(&mut tx, &generate_uuid(), notification, recipient).await?;
        }

        tx.commit().await?;

        Ok(recipients.len())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Notification>, SocioError> {
        let sql = format!("SELECT {} FROM notifications WHERE id = ?", NOTIFICATION_COLUMNS);
        let notification = sqlx::query_as::<_, Notification>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(notification)
    }

    /// Latest notifications for a recipient, newest first
    pub async fn list_for(&self, recipient_email: &str, limit: i64) -> Result<Vec<Notification>, SocioError> {
        let sql = format!(
            "SELECT {} FROM notifications WHERE recipient_email = ? ORDER BY created_at DESC LIMIT ?",
            NOTIFICATION_COLUMNS
        );
        let notifications = sqlx::query_as::<_, Notification>(&sql)
            .bind(recipient_email)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(notifications)
    }

    /// Mark one notification read. Returns false when the recipient does not own it.
    pub async fn mark_read(&self, id: &str, recipient_email: &str) -> Result<bool, SocioError> {
        let exists: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM notifications WHERE id = ? AND recipient_email = ?"
        )
        .bind(id)
        .bind(recipient_email)
        .fetch_optional(&self.pool)
        .await?;

        if exists.is_none() {
            return Ok(false);
        }

        sqlx::query("UPDATE notifications SET is_read = TRUE, read_at = ? WHERE id = ? AND recipient_email = ?")
            .bind(Utc::now())
            .bind(id)
            .bind(recipient_email)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }

    /// Mark every unread notification of a recipient read
    pub async fn mark_all_read(&self, recipient_email: &str) -> Result<u64, SocioError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = ? WHERE recipient_email = ? AND is_read = FALSE"
        )
        .bind(Utc::now())
        .bind(recipient_email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a notification owned by the recipient
    pub async fn delete(&self, id: &str, recipient_email: &str) -> Result<bool, SocioError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND recipient_email = ?")
            .bind(id)
            .bind(recipient_email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn insert(
    conn: &mut sqlx::MySqlConnection,
    id: &str,
    notification: &NewNotification,
    recipient_email: &str,
) -> Result<(), SocioError> {
    sqlx::query(
        r#"
        INSERT INTO notifications
            (id, title, message, type, event_id, event_title, action_url, recipient_email, is_read, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, FALSE, ?)
        "#
    )
    .bind(id)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(notification.notification_type.as_str())
    .bind(&notification.event_id)
    .bind(&notification.event_title)
    .bind(&notification.action_url)
    .bind(recipient_email)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(())
}
