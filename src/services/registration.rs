//! Registration service implementation
//!
//! Validates registration requests, issues the signed QR payload and keeps
//! the event head count in step with inserts and deletes.

use tracing::info;
use crate::database::DatabaseService;
use crate::models::registration::{CreateRegistrationRequest, NewRegistration, Registration, RegistrationType};
use crate::services::qr::QrService;
use crate::utils::errors::{SocioError, Result};
use crate::utils::helpers::{generate_compact_id, generate_uuid, non_blank};

/// Rendered QR code of a registration
#[derive(Debug, Clone)]
pub struct RegistrationQr {
    pub image: String,
    pub event_id: String,
}

#[derive(Clone)]
pub struct RegistrationService {
    db: DatabaseService,
    qr: QrService,
}

impl RegistrationService {
    pub fn new(db: DatabaseService, qr: QrService) -> Self {
        Self { db, qr }
    }

    pub async fn list_for_event(&self, event_id: Option<&str>) -> Result<Vec<Registration>> {
        let event_id = event_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SocioError::InvalidInput("Missing or invalid event_id parameter".to_string()))?;

        let rows = self.db.registrations.list_by_event(event_id).await?;
        Ok(rows.into_iter().map(Registration::from).collect())
    }

    pub async fn register(&self, request: CreateRegistrationRequest) -> Result<Registration> {
        let registration = prepare_registration(request, &self.qr)?;

        if !self.db.events.exists(&registration.event_id).await? {
            return Err(SocioError::NotFound("Event not found".to_string()));
        }

        let row = self.db.registrations.create(registration).await.map_err(|e| match e {
            SocioError::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                SocioError::Conflict("Registration with this ID already exists".to_string())
            }
            other => other,
        })?;

        info!(
            registration_id = %row.registration_id,
            event_id = %row.event_id,
            participants = row.participant_count(),
            "Registration created"
        );

        Ok(Registration::from(row))
    }

    pub async fn get(&self, registration_id: &str) -> Result<Registration> {
        self.db
            .registrations
            .find_by_registration_id(registration_id)
            .await?
            .map(Registration::from)
            .ok_or_else(|| SocioError::NotFound("Registration not found".to_string()))
    }

    pub async fn qr_code(&self, registration_id: &str) -> Result<RegistrationQr> {
        let registration = self
            .db
            .registrations
            .find_by_registration_id(registration_id)
            .await?
            .ok_or_else(|| SocioError::NotFound("Registration not found".to_string()))?;

        let data = registration
            .qr_code_data
            .filter(|d| !d.is_empty())
            .ok_or_else(|| SocioError::NotFound("QR code not found for this registration".to_string()))?;

        Ok(RegistrationQr {
            image: self.qr.render(&data)?,
            event_id: registration.event_id,
        })
    }

    pub async fn delete(&self, registration_id: &str) -> Result<Registration> {
        let removed = self
            .db
            .registrations
            .delete(registration_id)
            .await?
            .ok_or_else(|| SocioError::NotFound("Registration not found".to_string()))?;

        info!(registration_id = %removed.registration_id, event_id = %removed.event_id, "Registration deleted");
        Ok(Registration::from(removed))
    }
}

/// Validate a registration request and assign its ids and QR payload
pub fn prepare_registration(request: CreateRegistrationRequest, qr: &QrService) -> Result<NewRegistration> {
    let event_id = non_blank(request.event_id.clone());
    let registration_type = non_blank(request.registration_type.clone());
    let (Some(event_id), Some(registration_type)) = (event_id, registration_type) else {
        return Err(SocioError::InvalidInput("event_id and registration_type are required".to_string()));
    };

    let kind: RegistrationType = registration_type
        .parse()
        .map_err(|_| SocioError::InvalidInput("registration_type must be 'individual' or 'team'".to_string()))?;

    if kind == RegistrationType::Team && non_blank(request.team_name.clone()).is_none() {
        return Err(SocioError::InvalidInput("team_name is required for team registrations".to_string()));
    }

    let registration_id = generate_compact_id();
    let participant_email = request.participant_email(kind);
    let qr_code_data = qr.issue(&registration_id, &event_id, participant_email.as_deref())?;
    let participant_count = kind.participant_count(request.teammates.as_deref().unwrap_or_default());

    Ok(NewRegistration {
        id: generate_uuid(),
        registration_id,
        event_id,
        registration_type: kind,
        request,
        qr_code_data,
        participant_count,
    })
}
