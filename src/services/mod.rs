//! Services module
//!
//! This module contains business logic services

pub mod attendance;
pub mod auth;
pub mod event;
pub mod fest;
pub mod notification;
pub mod qr;
pub mod registration;
pub mod storage;
pub mod user;

// Re-export commonly used services
pub use attendance::{AttendanceService, ScanOutcome, ScannedParticipant};
pub use auth::{AuthService, AuthUser};
pub use event::{EventService, EventUploads};
pub use fest::FestService;
pub use notification::NotificationService;
pub use qr::{QrPayload, QrService};
pub use registration::{RegistrationQr, RegistrationService};
pub use storage::{FileStorage, StoredFile, Upload};
pub use user::{SyncOutcome, UserService};

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub event_service: EventService,
    pub fest_service: FestService,
    pub registration_service: RegistrationService,
    pub attendance_service: AttendanceService,
    pub notification_service: NotificationService,
    pub storage: FileStorage,
    pub qr: QrService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, db: DatabaseService) -> Result<Self> {
        let auth_service = AuthService::new(&settings.auth)?;
        let storage = FileStorage::new(&settings.storage);
        let qr = QrService::new(&settings.qr);

        Ok(Self {
            auth_service,
            user_service: UserService::new(db.users.clone()),
            event_service: EventService::new(db.clone(), storage.clone()),
            fest_service: FestService::new(db.clone(), storage.clone()),
            registration_service: RegistrationService::new(db.clone(), qr.clone()),
            attendance_service: AttendanceService::new(db.clone(), qr.clone()),
            notification_service: NotificationService::new(db.notifications.clone()),
            storage,
            qr,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self, db: &DatabaseService) -> ServiceHealthStatus {
        let database_healthy = db.health_check().await.is_ok();
        let storage_writable = tokio::fs::create_dir_all(self.storage.root()).await.is_ok();

        ServiceHealthStatus {
            database_healthy,
            storage_writable,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone, serde::Serialize)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    pub storage_writable: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.database_healthy && self.storage_writable
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }
        if !self.storage_writable {
            issues.push("Upload directory is not writable".to_string());
        }

        issues
    }
}
