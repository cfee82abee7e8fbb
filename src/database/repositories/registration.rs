//! Registration repository implementation

use sqlx::MySqlPool;
use chrono::Utc;
use crate::models::registration::{RegistrationRow, NewRegistration};
use crate::utils::errors::SocioError;
use crate::utils::json_fields::encode_column;

const REGISTRATION_COLUMNS: &str = "id, registration_id, event_id, user_email, registration_type, \
    individual_name, individual_email, individual_register_number, team_name, team_leader_name, \
    team_leader_email, team_leader_register_number, teammates, qr_code_data, qr_code_generated_at, created_at";

#[derive(Clone, Debug)]
pub struct RegistrationRepository {
    pool: MySqlPool,
}

impl RegistrationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a registration and bump the event head count atomically.
    ///
    /// The event row is locked for the duration of the transaction so the
    /// capacity check cannot race with a concurrent registration.
    pub async fn create(&self, registration: NewRegistration) -> Result<RegistrationRow, SocioError> {
        let mut tx = self.pool.begin().await?;

        let capacity: Option<(i32, Option<i32>)> = sqlx::query_as(
            "SELECT total_participants, max_participants FROM events WHERE event_id = ? FOR UPDATE"
        )
        .bind(&registration.event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (total, max) = capacity.ok_or_else(|| SocioError::NotFound("Event not found".to_string()))?;
        if let Some(max) = max {
            if total + registration.participant_count > max {
                return Err(SocioError::Conflict("Event is full".to_string()));
            }
        }

        let request = registration.request;
        let teammates = request.teammates.as_ref().map(encode_column).transpose()?;

        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, registration_id, event_id, user_email, registration_type,
                individual_name, individual_email, individual_register_number,
                team_name, team_leader_name, team_leader_email, team_leader_register_number,
                teammates, qr_code_data, qr_code_generated_at, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&registration.id)
        .bind(&registration.registration_id)
        .bind(&registration.event_id)
        .bind(request.user_email)
        .bind(registration.registration_type.as_str())
        .bind(request.individual_name)
        .bind(request.individual_email)
        .bind(request.individual_register_number)
        .bind(request.team_name)
        .bind(request.team_leader_name)
        .bind(request.team_leader_email)
        .bind(request.team_leader_register_number)
        .bind(teammates)
        .bind(&registration.qr_code_data)
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE events SET total_participants = total_participants + ? WHERE event_id = ?")
            .bind(registration.participant_count)
            .bind(&registration.event_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, RegistrationRow>(
            &format!("SELECT {} FROM registrations WHERE id = ?", REGISTRATION_COLUMNS)
        )
        .bind(&registration.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row)
    }

    /// Find registration by its public registration id
    pub async fn find_by_registration_id(&self, registration_id: &str) -> Result<Option<RegistrationRow>, SocioError> {
        let registration = sqlx::query_as::<_, RegistrationRow>(
            &format!("SELECT {} FROM registrations WHERE registration_id = ?", REGISTRATION_COLUMNS)
        )
        .bind(registration_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// List registrations for an event, newest first
    pub async fn list_by_event(&self, event_id: &str) -> Result<Vec<RegistrationRow>, SocioError> {
        let registrations = sqlx::query_as::<_, RegistrationRow>(
            &format!(
                "SELECT {} FROM registrations WHERE event_id = ? ORDER BY created_at DESC",
                REGISTRATION_COLUMNS
            )
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Remove a registration, its attendance row, and release its head count
    pub async fn delete(&self, registration_id: &str) -> Result<Option<RegistrationRow>, SocioError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, RegistrationRow>(
            &format!(
                "SELECT {} FROM registrations WHERE registration_id = ? FOR UPDATE",
                REGISTRATION_COLUMNS
            )
        )
        .bind(registration_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(registration) = existing else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM attendance_status WHERE registration_id = ?")
            .bind(&registration.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM registrations WHERE id = ?")
            .bind(&registration.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE events SET total_participants = GREATEST(total_participants - ?, 0) WHERE event_id = ?"
        )
        .bind(registration.participant_count())
        .bind(&registration.event_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(registration))
    }
}
