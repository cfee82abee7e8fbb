//! Fest service implementation

use tracing::info;
use crate::database::DatabaseService;
use crate::models::event::Event;
use crate::models::fest::{CreateFestRequest, Fest, FestDetails};
use crate::models::User;
use crate::services::auth::{require_owner, AuthUser};
use crate::services::storage::{FileStorage, Upload, FEST_IMAGES};
use crate::utils::errors::{SocioError, Result};
use crate::utils::helpers::generate_uuid;
use crate::utils::logging::log_event_action;

#[derive(Clone)]
pub struct FestService {
    db: DatabaseService,
    storage: FileStorage,
}

impl FestService {
    pub fn new(db: DatabaseService, storage: FileStorage) -> Self {
        Self { db, storage }
    }

    pub async fn list(&self) -> Result<Vec<Fest>> {
        self.db.fests.list().await
    }

    pub async fn get(&self, fest_id: &str) -> Result<Fest> {
        let fest_id = require_fest_id(fest_id)?;
        self.db
            .fests
            .find_by_fest_id(fest_id)
            .await?
            .map(Fest::from)
            .ok_or_else(|| not_found(fest_id))
    }

    /// Events that name this fest
    pub async fn events(&self, fest_id: &str) -> Result<Vec<Event>> {
        let fest = self.get(fest_id).await?;
        self.db.events.list_by_fest(&fest.fest_title).await
    }

    pub async fn create(&self, organiser: &User, auth: &AuthUser, details: FestDetails, image: Option<Upload>) -> Result<Fest> {
        let fest_title = details
            .fest_title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SocioError::InvalidInput("Fest title is required".to_string()))?;

        let fest_image_url = self.storage.store_upload(FEST_IMAGES, &auth.id, image.as_ref()).await?;
        let request = CreateFestRequest {
            fest_id: generate_uuid(),
            fest_title: fest_title.trim().to_string(),
            details,
            fest_image_url: fest_image_url.clone(),
            created_by: organiser.email.clone(),
            auth_uuid: auth.id.clone(),
        };

        match self.db.fests.create(request).await {
            Ok(fest) => {
                info!(fest_id = %fest.fest_id, created_by = %organiser.email, "Fest created");
                log_event_action(&fest.fest_id, "fest_created", &organiser.email, Some(&fest.fest_title));
                Ok(fest)
            }
            Err(e) => {
                self.storage.remove_url(fest_image_url.as_deref(), FEST_IMAGES).await;
                Err(e)
            }
        }
    }

    pub async fn update(&self, fest_id: &str, auth: &AuthUser, details: FestDetails, image: Option<Upload>) -> Result<Fest> {
        let existing = self.get(fest_id).await?;
        require_owner(existing.auth_uuid.as_deref(), auth)?;

        let fest_image_url = self.storage.store_upload(FEST_IMAGES, &auth.id, image.as_ref()).await?;
        let fest = match self.db.fests.update(&existing.fest_id, details, fest_image_url.clone()).await {
            Ok(fest) => fest,
            Err(e) => {
                self.storage.remove_url(fest_image_url.as_deref(), FEST_IMAGES).await;
                return Err(e);
            }
        };

        if fest_image_url.is_some() {
            self.storage.remove_url(existing.fest_image_url.as_deref(), FEST_IMAGES).await;
        }

        log_event_action(&fest.fest_id, "fest_updated", auth.email.as_deref().unwrap_or(&auth.id), None);
        Ok(fest)
    }

    /// Delete a fest owned by the caller; its events are left in place
    pub async fn delete(&self, fest_id: &str, auth: &AuthUser) -> Result<Fest> {
        let existing = self.get(fest_id).await?;
        require_owner(existing.auth_uuid.as_deref(), auth)?;

        if !self.db.fests.delete(&existing.fest_id).await? {
            return Err(not_found(&existing.fest_id));
        }

        self.storage.remove_url(existing.fest_image_url.as_deref(), FEST_IMAGES).await;
        log_event_action(&existing.fest_id, "fest_deleted", auth.email.as_deref().unwrap_or(&auth.id), None);
        Ok(existing)
    }
}

fn require_fest_id(fest_id: &str) -> Result<&str> {
    let fest_id = fest_id.trim();
    if fest_id.is_empty() {
        Err(SocioError::InvalidInput("Fest ID is required".to_string()))
    } else {
        Ok(fest_id)
    }
}

fn not_found(fest_id: &str) -> SocioError {
    SocioError::NotFound(format!("Fest with ID '{}' not found.", fest_id))
}
