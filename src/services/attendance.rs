//! Attendance service implementation
//!
//! Rosters, bulk marking, statistics and QR check-in for an event. Every
//! operation is restricted to the event's owner.

use serde::Serialize;
use tracing::{info, warn};
use crate::database::DatabaseService;
use crate::models::attendance::{
    AttendanceStats, AttendanceStatus, MarkAttendanceRequest, Participant, ScanLog, ScanRequest, ScanResult,
};
use crate::models::event::Event;
use crate::models::registration::RegistrationType;
use crate::services::auth::{require_owner, AuthUser};
use crate::services::qr::QrService;
use crate::utils::errors::{SocioError, Result};
use crate::utils::logging::log_attendance_action;

pub const SCAN_LOG_LIMIT: i64 = 100;

/// Participant summary returned for a successful scan
#[derive(Debug, Clone, Serialize)]
pub struct ScannedParticipant {
    pub name: Option<String>,
    pub email: Option<String>,
    pub registration_type: String,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub registration_id: String,
    pub participant: ScannedParticipant,
}

#[derive(Clone)]
pub struct AttendanceService {
    db: DatabaseService,
    qr: QrService,
}

impl AttendanceService {
    pub fn new(db: DatabaseService, qr: QrService) -> Self {
        Self { db, qr }
    }

    /// Load an event the caller owns
    pub async fn owned_event(&self, event_id: &str, auth: &AuthUser) -> Result<Event> {
        let event = self
            .db
            .events
            .find_by_event_id(event_id)
            .await?
            .map(Event::from)
            .ok_or_else(|| SocioError::NotFound("Event not found".to_string()))?;

        require_owner(event.auth_uuid.as_deref(), auth)?;
        Ok(event)
    }

    pub async fn participants(&self, event_id: &str, auth: &AuthUser) -> Result<(Event, Vec<Participant>)> {
        let event = self.owned_event(event_id, auth).await?;
        let rows = self.db.attendance.list_participants(&event.event_id).await?;

        Ok((event, rows.into_iter().map(Participant::from).collect()))
    }

    /// Mark many participants at once. Returns how many were updated.
    pub async fn mark(&self, event_id: &str, auth: &AuthUser, request: MarkAttendanceRequest) -> Result<usize> {
        let ids = request
            .participant_ids
            .filter(|ids| !ids.is_empty())
            .ok_or_else(|| SocioError::InvalidInput("participantIds array is required".to_string()))?;
        let status: AttendanceStatus = request
            .status
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| SocioError::InvalidInput("Status must be 'attended' or 'absent'".to_string()))?;

        let event = self.owned_event(event_id, auth).await?;
        let marked_by = request
            .marked_by
            .filter(|m| !m.trim().is_empty())
            .or_else(|| auth.email.clone())
            .unwrap_or_else(|| auth.id.clone());

        let updated = self
            .db
            .attendance
            .mark_many(&event.event_id, &ids, status, &marked_by)
            .await?;

        if updated < ids.len() {
            warn!(event_id = %event.event_id, requested = ids.len(), updated = updated, "Some participants were not part of the event");
        }
        log_attendance_action(&event.event_id, status.as_str(), updated, &marked_by);

        Ok(updated)
    }

    pub async fn stats(&self, event_id: &str, auth: &AuthUser) -> Result<AttendanceStats> {
        let event = self.owned_event(event_id, auth).await?;
        self.db.attendance.stats(&event.event_id).await
    }

    /// Check a participant in from scanned QR data. Every attempt is logged.
    pub async fn scan(&self, event_id: &str, auth: &AuthUser, request: ScanRequest) -> Result<ScanOutcome> {
        let data = request
            .qr_data
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| SocioError::InvalidInput("qrData is required".to_string()))?;

        let event = self.owned_event(event_id, auth).await?;
        let scanned_by = auth.email.clone().unwrap_or_else(|| auth.id.clone());
        let event_id = event.event_id.as_str();

        let payload = match self.qr.verify(&data) {
            Ok(payload) => payload,
            Err(e) => {
                self.log_scan(event_id, None, &scanned_by, ScanResult::Invalid, Some("Signature check failed")).await;
                return Err(e);
            }
        };

        let registration = match self.db.registrations.find_by_registration_id(&payload.registration_id).await? {
            Some(registration) => registration,
            None => {
                self.log_scan(event_id, Some(&payload.registration_id), &scanned_by, ScanResult::NotFound, None).await;
                return Err(SocioError::NotFound("Registration not found".to_string()));
            }
        };

        if payload.event_id != event_id || registration.event_id != event_id {
            let details = format!("QR issued for event '{}'", payload.event_id);
            self.log_scan(event_id, Some(&payload.registration_id), &scanned_by, ScanResult::WrongEvent, Some(&details)).await;
            return Err(SocioError::InvalidInput("QR code is for a different event".to_string()));
        }

        self.db
            .attendance
            .mark_one(&registration.id, event_id, AttendanceStatus::Attended, &scanned_by)
            .await?;
        self.log_scan(event_id, Some(&registration.registration_id), &scanned_by, ScanResult::Success, None).await;

        info!(event_id = event_id, registration_id = %registration.registration_id, scanned_by = %scanned_by, "Participant checked in");

        let participant = match registration.kind() {
            RegistrationType::Individual => ScannedParticipant {
                name: registration.individual_name.clone(),
                email: registration.individual_email.clone().or(registration.user_email.clone()),
                registration_type: registration.registration_type.clone(),
                team_name: None,
            },
            RegistrationType::Team => ScannedParticipant {
                name: registration.team_leader_name.clone(),
                email: registration.team_leader_email.clone().or(registration.user_email.clone()),
                registration_type: registration.registration_type.clone(),
                team_name: registration.team_name.clone(),
            },
        };

        Ok(ScanOutcome {
            registration_id: registration.registration_id,
            participant,
        })
    }

    pub async fn scan_logs(&self, event_id: &str, auth: &AuthUser) -> Result<Vec<ScanLog>> {
        let event = self.owned_event(event_id, auth).await?;
        self.db.scan_logs.list_by_event(&event.event_id, SCAN_LOG_LIMIT).await
    }

    async fn log_scan(&self, event_id: &str, registration_id: Option<&str>, scanned_by: &str, result: ScanResult, details: Option<&str>) {
        if let Err(e) = self
            .db
            .scan_logs
            .record(event_id, registration_id, scanned_by, result, details)
            .await
        {
            warn!(event_id = event_id, result = result.as_str(), error = %e, "Failed to record QR scan");
        }
    }
}
