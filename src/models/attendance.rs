//! Attendance and QR scan models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::utils::json_fields::decode_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Attended,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Attended => "attended",
            AttendanceStatus::Absent => "absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attended" => Ok(AttendanceStatus::Attended),
            "absent" => Ok(AttendanceStatus::Absent),
            other => Err(format!("unknown attendance status: {}", other)),
        }
    }
}

/// Registration joined with its attendance row
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantRow {
    pub id: String,
    pub registration_id: String,
    pub event_id: String,
    pub registration_type: String,
    pub individual_name: Option<String>,
    pub individual_email: Option<String>,
    pub individual_register_number: Option<String>,
    pub team_name: Option<String>,
    pub team_leader_name: Option<String>,
    pub team_leader_email: Option<String>,
    pub team_leader_register_number: Option<String>,
    pub teammates: Option<String>,
    pub created_at: DateTime<Utc>,
    pub attendance_status: String,
    pub marked_at: Option<DateTime<Utc>>,
    pub marked_by: Option<String>,
}

/// Roster entry. Individual and team fields are mutually exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub registration_id: String,
    pub event_id: String,
    pub registration_type: String,
    pub created_at: DateTime<Utc>,
    pub attendance_status: String,
    pub marked_at: Option<DateTime<Utc>>,
    pub marked_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_register_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_leader_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_leader_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_leader_register_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teammates: Option<Vec<Value>>,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        let mut participant = Self {
            id: row.id,
            registration_id: row.registration_id,
            event_id: row.event_id,
            registration_type: row.registration_type,
            created_at: row.created_at,
            attendance_status: row.attendance_status,
            marked_at: row.marked_at,
            marked_by: row.marked_by,
            individual_name: None,
            individual_email: None,
            individual_register_number: None,
            team_name: None,
            team_leader_name: None,
            team_leader_email: None,
            team_leader_register_number: None,
            teammates: None,
        };

        if participant.registration_type == "individual" {
            participant.individual_name = row.individual_name;
            participant.individual_email = row.individual_email;
            participant.individual_register_number = row.individual_register_number;
        } else {
            participant.team_name = row.team_name;
            participant.team_leader_name = row.team_leader_name;
            participant.team_leader_email = row.team_leader_email;
            participant.team_leader_register_number = row.team_leader_register_number;
            participant.teammates = Some(decode_list(row.teammates.as_deref()));
        }

        participant
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub total: i64,
    pub attended: i64,
    pub absent: i64,
    pub pending: i64,
    #[serde(rename = "attendanceRate")]
    pub attendance_rate: f64,
}

impl AttendanceStats {
    /// Build stats from raw counts; rate is a percentage rounded to one decimal
    pub fn from_counts(total: i64, attended: i64, absent: i64) -> Self {
        let attendance_rate = if total > 0 {
            (attended as f64 / total as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        Self {
            total,
            attended,
            absent,
            pending: (total - attended - absent).max(0),
            attendance_rate,
        }
    }
}

/// Body of `POST /api/events/:eventId/attendance`
#[derive(Debug, Clone, Deserialize)]
pub struct MarkAttendanceRequest {
    #[serde(rename = "participantIds")]
    pub participant_ids: Option<Vec<String>>,
    pub status: Option<String>,
    #[serde(rename = "markedBy")]
    pub marked_by: Option<String>,
}

/// Body of `POST /api/events/:eventId/scan`
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    #[serde(rename = "qrData")]
    pub qr_data: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanResult {
    Success,
    Invalid,
    WrongEvent,
    NotFound,
}

impl ScanResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanResult::Success => "success",
            ScanResult::Invalid => "invalid",
            ScanResult::WrongEvent => "wrong_event",
            ScanResult::NotFound => "not_found",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScanLog {
    pub id: String,
    pub registration_id: Option<String>,
    pub event_id: String,
    pub scanned_by: Option<String>,
    pub scan_result: String,
    pub details: Option<String>,
    pub scanned_at: DateTime<Utc>,
}
