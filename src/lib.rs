//! Socio campus events backend
//!
//! HTTP API for campus events and fests: organisers publish events, students
//! register individually or as teams, and attendance is taken by scanning
//! signed QR codes at the venue.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{SocioError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use server::build_router;
pub use services::ServiceFactory;
pub use state::{AppState, SharedState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
