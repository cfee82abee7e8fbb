//! Attendance repository implementation

use std::collections::HashSet;

use sqlx::{MySqlConnection, MySqlPool};
use chrono::{DateTime, Utc};
use crate::models::attendance::{AttendanceStats, AttendanceStatus, ParticipantRow};
use crate::utils::errors::SocioError;
use crate::utils::helpers::generate_uuid;

#[derive(Clone, Debug)]
pub struct AttendanceRepository {
    pool: MySqlPool,
}

async fn upsert_status(
    conn: &mut MySqlConnection,
    registration_pk: &str,
    event_id: &str,
    status: AttendanceStatus,
    marked_at: DateTime<Utc>,
    marked_by: &str,
) -> Result<(), SocioError> {
    sqlx::query(
        r#"
        INSERT INTO attendance_status (id, registration_id, event_id, status, marked_at, marked_by)
        VALUES (?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            status = VALUES(status),
            marked_at = VALUES(marked_at),
            marked_by = VALUES(marked_by)
        "#
    )
    .bind(generate_uuid())
    .bind(registration_pk)
    .bind(event_id)
    .bind(status.as_str())
    .bind(marked_at)
    .bind(marked_by)
    .execute(conn)
    .await?;

    Ok(())
}

impl AttendanceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Registrations of an event joined with their attendance, newest first.
    /// Unmarked registrations report `absent`.
    pub async fn list_participants(&self, event_id: &str) -> Result<Vec<ParticipantRow>, SocioError> {
        let rows = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT
                r.id, r.registration_id, r.event_id, r.registration_type,
                r.individual_name, r.individual_email, r.individual_register_number,
                r.team_name, r.team_leader_name, r.team_leader_email, r.team_leader_register_number,
                r.teammates, r.created_at,
                COALESCE(a.status, 'absent') AS attendance_status,
                a.marked_at,
                a.marked_by
            FROM registrations r
            LEFT JOIN attendance_status a ON r.id = a.registration_id
            WHERE r.event_id = ?
            ORDER BY r.created_at DESC
            "#
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Upsert the same status for many registrations in one transaction.
    ///
    /// Ids that are not registrations of `event_id` are skipped. Returns the
    /// number of registrations updated.
    pub async fn mark_many(
        &self,
        event_id: &str,
        registration_pks: &[String],
        status: AttendanceStatus,
        marked_by: &str,
    ) -> Result<usize, SocioError> {
        let mut tx = self.pool.begin().await?;

        let known: Vec<(String,)> = sqlx::query_as("SELECT id FROM registrations WHERE event_id = ?")
            .bind(event_id)
            .fetch_all(&mut *tx)
            .await?;
        let known: HashSet<String> = known.into_iter().map(|(id,)| id).collect();

        let now = Utc::now();
        let mut updated = 0;
        let mut seen = HashSet::new();

        for pk in registration_pks {
            if !known.contains(pk) || !seen.insert(pk.as_str()) {
                tracing::debug!(event_id = event_id, registration = %pk, "Skipping attendance for unknown or repeated registration");
                continue;
            }
            upsert_status(&mut tx, pk, event_id, status, now, marked_by).await?;
            updated += 1;
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// Upsert the status of a single registration
    pub async fn mark_one(
        &self,
        registration_pk: &str,
        event_id: &str,
        status: AttendanceStatus,
        marked_by: &str,
    ) -> Result<(), SocioError> {
        let mut conn = self.pool.acquire().await?;
        upsert_status(&mut conn, registration_pk, event_id, status, Utc::now(), marked_by).await
    }

    /// Count registrations by attendance state
    pub async fn stats(&self, event_id: &str) -> Result<AttendanceStats, SocioError> {
        let (total, attended, absent): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(CASE WHEN a.status = 'attended' THEN 1 END),
                COUNT(CASE WHEN a.status = 'absent' THEN 1 END)
            FROM registrations r
            LEFT JOIN attendance_status a ON r.id = a.registration_id
            WHERE r.event_id = ?
            "#
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(AttendanceStats::from_counts(total, attended, absent))
    }
}
