//! Logging configuration and setup
//! 
//! This module provides logging initialization and structured logging utilities
//! for the Socio backend.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer and must be held for the
/// lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let stdout_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    let guard = match config.file_path.as_deref().filter(|p| !p.is_empty()) {
        Some(file_path) => {
            let (directory, file_name) = split_log_path(file_path);
            std::fs::create_dir_all(&directory)?;
            let file_appender = tracing_appender::rolling::daily(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .init();
            None
        }
    };

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Directory and file name prefix for the daily rolling log file
fn split_log_path(file_path: &str) -> (PathBuf, String) {
    let path = Path::new(file_path);
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "socio.log".to_string());

    (directory, file_name)
}

/// Log user actions with structured data
pub fn log_user_action(user_email: &str, action: &str, details: Option<&str>) {
    info!(
        user_email = user_email,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log event and fest management actions
pub fn log_event_action(event_id: &str, action: &str, actor: &str, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        actor = actor,
        details = details,
        "Event action performed"
    );
}

/// Log attendance changes
pub fn log_attendance_action(event_id: &str, status: &str, count: usize, marked_by: &str) {
    info!(
        event_id = event_id,
        status = status,
        count = count,
        marked_by = marked_by,
        "Attendance updated"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path("logs/socio.log"),
            (PathBuf::from("logs"), "socio.log".to_string())
        );
        assert_eq!(
            split_log_path("/var/log/socio/api.log"),
            (PathBuf::from("/var/log/socio"), "api.log".to_string())
        );
        assert_eq!(split_log_path("socio.log"), (PathBuf::from("."), "socio.log".to_string()));
    }
}
