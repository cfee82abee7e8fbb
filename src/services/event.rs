//! Event service implementation
//!
//! Event creation and editing with the attached image, banner and PDF files.

use tracing::{info, warn};
use crate::database::DatabaseService;
use crate::models::event::{CreateEventRequest, Event, EventAssets, EventDetails};
use crate::models::User;
use crate::services::auth::{require_owner, AuthUser};
use crate::services::storage::{FileStorage, Upload, EVENT_BANNERS, EVENT_IMAGES, EVENT_PDFS};
use crate::utils::errors::{SocioError, Result};
use crate::utils::helpers::generate_uuid;
use crate::utils::logging::log_event_action;

/// Files submitted with an event form
#[derive(Debug, Clone, Default)]
pub struct EventUploads {
    pub image: Option<Upload>,
    pub banner: Option<Upload>,
    pub pdf: Option<Upload>,
}

#[derive(Clone)]
pub struct EventService {
    db: DatabaseService,
    storage: FileStorage,
}

impl EventService {
    pub fn new(db: DatabaseService, storage: FileStorage) -> Self {
        Self { db, storage }
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.db.events.list().await
    }

    pub async fn get(&self, event_id: &str) -> Result<Event> {
        let event_id = require_id(event_id)?;
        self.db.require_event(event_id).await
    }

    /// Create an event owned by `organiser`
    pub async fn create(
        &self,
        organiser: &User,
        auth: &AuthUser,
        details: EventDetails,
        uploads: EventUploads,
    ) -> Result<Event> {
        let title = details
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SocioError::InvalidInput("Title is required and must be a non-empty string.".to_string()))?;

        let assets = self.store_uploads(&auth.id, &uploads).await?;
        let request = CreateEventRequest {
            event_id: generate_uuid(),
            title: title.trim().to_string(),
            details,
            assets: assets.clone(),
            created_by: organiser.email.clone(),
            auth_uuid: auth.id.clone(),
        };

        match self.db.events.create(request).await {
            Ok(event) => {
                info!(event_id = %event.event_id, created_by = %organiser.email, "Event created");
                log_event_action(&event.event_id, "created", &organiser.email, Some(&event.title));
                Ok(event)
            }
            Err(e) => {
                self.remove_assets(&assets).await;
                Err(e)
            }
        }
    }

    /// Update the supplied fields of an event owned by the caller. Files
    /// replaced by new uploads are removed once the update is stored.
    pub async fn update(
        &self,
        event_id: &str,
        auth: &AuthUser,
        details: EventDetails,
        uploads: EventUploads,
    ) -> Result<Event> {
        let event_id = require_id(event_id)?;
        let existing = self.db.require_event(event_id).await?;
        require_owner(existing.auth_uuid.as_deref(), auth)?;

        let assets = self.store_uploads(&auth.id, &uploads).await?;
        let event = match self.db.events.update(event_id, details, assets.clone()).await {
            Ok(event) => event,
            Err(e) => {
                self.remove_assets(&assets).await;
                return Err(e);
            }
        };

        let replaced = EventAssets {
            event_image_url: assets.event_image_url.and(existing.event_image_url),
            banner_url: assets.banner_url.and(existing.banner_url),
            pdf_url: assets.pdf_url.and(existing.pdf_url),
        };
        self.remove_assets(&replaced).await;

        log_event_action(event_id, "updated", auth.email.as_deref().unwrap_or(&auth.id), None);
        Ok(event)
    }

    /// Delete an event owned by the caller with its registrations, attendance
    /// and stored files
    pub async fn delete(&self, event_id: &str, auth: &AuthUser) -> Result<Event> {
        let event_id = require_id(event_id)?;
        let existing = self.db.require_event(event_id).await?;
        require_owner(existing.auth_uuid.as_deref(), auth)?;

        if !self.db.events.delete_cascade(event_id).await? {
            return Err(SocioError::NotFound(format!("Event with ID '{}' not found.", event_id)));
        }

        self.remove_assets(&EventAssets {
            event_image_url: existing.event_image_url.clone(),
            banner_url: existing.banner_url.clone(),
            pdf_url: existing.pdf_url.clone(),
        })
        .await;

        log_event_action(event_id, "deleted", auth.email.as_deref().unwrap_or(&auth.id), None);
        Ok(existing)
    }

    async fn store_uploads(&self, owner: &str, uploads: &EventUploads) -> Result<EventAssets> {
        let mut assets = EventAssets::default();

        let stored = async {
            assets.event_image_url = self.storage.store_upload(EVENT_IMAGES, owner, uploads.image.as_ref()).await?;
            assets.banner_url = self.storage.store_upload(EVENT_BANNERS, owner, uploads.banner.as_ref()).await?;
            assets.pdf_url = self.storage.store_upload(EVENT_PDFS, owner, uploads.pdf.as_ref()).await?;
            Ok::<(), SocioError>(())
        }
        .await;

        if let Err(e) = stored {
            warn!(error = %e, "Upload failed, removing files stored so far");
            self.remove_assets(&assets).await;
            return Err(e);
        }

        Ok(assets)
    }

    async fn remove_assets(&self, assets: &EventAssets) {
        self.storage.remove_url(assets.event_image_url.as_deref(), EVENT_IMAGES).await;
        self.storage.remove_url(assets.banner_url.as_deref(), EVENT_BANNERS).await;
        self.storage.remove_url(assets.pdf_url.as_deref(), EVENT_PDFS).await;
    }
}

fn require_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        Err(SocioError::InvalidInput("Event ID is required".to_string()))
    } else {
        Ok(id)
    }
}
