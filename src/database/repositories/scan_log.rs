//! QR scan audit log repository

use sqlx::MySqlPool;
use chrono::Utc;
use crate::models::attendance::{ScanLog, ScanResult};
use crate::utils::errors::SocioError;
use crate::utils::helpers::generate_uuid;

#[derive(Clone, Debug)]
pub struct ScanLogRepository {
    pool: MySqlPool,
}

impl ScanLogRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Record a scan attempt
    pub async fn record(
        &self,
        event_id: &str,
        registration_id: Option<&str>,
        scanned_by: &str,
        result: ScanResult,
        details: Option<&str>,
    ) -> Result<(), SocioError> {
        sqlx::query(
            r#"
            INSERT INTO qr_scan_logs (id, registration_id, event_id, scanned_by, scan_result, details, scanned_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(generate_uuid())
        .bind(registration_id)
        .bind(event_id)
        .bind(scanned_by)
        .bind(result.as_str())
        .bind(details)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent scans for an event
    pub async fn list_by_event(&self, event_id: &str, limit: i64) -> Result<Vec<ScanLog>, SocioError> {
        let logs = sqlx::query_as::<_, ScanLog>(
            r#"
            SELECT id, registration_id, event_id, scanned_by, scan_result, details, scanned_at
            FROM qr_scan_logs
            WHERE event_id = ?
            ORDER BY scanned_at DESC
            LIMIT ?
            "#
        )
        .bind(event_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
