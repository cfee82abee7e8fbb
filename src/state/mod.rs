//! Application state module
//!
//! Shared state handed to every request handler

use std::sync::Arc;

use crate::config::Settings;
use crate::database::{DatabasePool, DatabaseService};
use crate::models::User;
use crate::services::auth::{require_organiser, AuthUser};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

pub type SharedState = Arc<AppState>;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub db: DatabaseService,
    pub services: ServiceFactory,
}

impl AppState {
    pub fn new(settings: Settings, pool: DatabasePool) -> Result<Self> {
        let db = DatabaseService::new(pool);
        let services = ServiceFactory::new(&settings, db.clone())?;

        Ok(Self { settings, db, services })
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    /// Local user row of the caller
    pub async fn current_user(&self, auth: &AuthUser) -> Result<User> {
        self.services.auth_service.current_user(&self.db.users, auth).await
    }

    /// Local user row of the caller, who must be an organiser
    pub async fn organiser(&self, auth: &AuthUser) -> Result<User> {
        let user = self.current_user(auth).await?;
        require_organiser(&user)?;
        Ok(user)
    }
}
