//! Database service layer
//! 
//! This module provides a high-level interface to database operations

use crate::database::{
    DatabasePool, UserRepository, EventRepository, FestRepository, RegistrationRepository,
    AttendanceRepository, NotificationRepository, ScanLogRepository,
};
use std::time::Instant;

use crate::models::Event;
use crate::utils::errors::SocioError;
use crate::utils::logging::log_database_operation;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub events: EventRepository,
    pub fests: FestRepository,
    pub registrations: RegistrationRepository,
    pub attendance: AttendanceRepository,
    pub notifications: NotificationRepository,
    pub scan_logs: ScanLogRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            fests: FestRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            attendance: AttendanceRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            scan_logs: ScanLogRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Load an event or fail with the public not-found message
    pub async fn require_event(&self, event_id: &str) -> Result<Event, SocioError> {
        self.events
            .find_by_event_id(event_id)
            .await?
            .map(Event::from)
            .ok_or_else(|| SocioError::NotFound(format!("Event with ID '{}' not found.", event_id)))
    }

    pub async fn health_check(&self) -> Result<(), SocioError> {
        let started = Instant::now();
        let result = crate::database::connection::health_check(&self.pool).await;
        log_database_operation("ping", "-", started.elapsed().as_millis() as u64, result.is_ok());
        result
    }
}
