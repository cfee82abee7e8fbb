//! Error handling for Socio
//! 
//! This module defines the main error type used throughout the application
//! and how each failure is rendered as an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Main error type for Socio application
#[derive(Error, Debug)]
pub enum SocioError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    
    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration error: {0}")]
    ConfigLoad(#[from] config::ConfigError),
    
    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    PermissionDenied(String),
    
    #[error("{0}")]
    NotFound(String),
    
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("QR code error: {0}")]
    Qr(String),

    #[error("Authentication service error: {0}")]
    AuthService(String),
    
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl From<axum::extract::rejection::JsonRejection> for SocioError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        SocioError::InvalidInput(rejection.body_text())
    }
}

/// Result type alias for Socio operations
pub type Result<T> = std::result::Result<T, SocioError>;

impl SocioError {
    /// HTTP status the error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            SocioError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SocioError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            SocioError::NotFound(_) => StatusCode::NOT_FOUND,
            SocioError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SocioError::Multipart(e) => e.status(),
            SocioError::Conflict(_) => StatusCode::CONFLICT,
            SocioError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            SocioError::Database(sqlx::Error::Database(db_err)) => {
                if db_err.is_unique_violation() {
                    StatusCode::CONFLICT
                } else if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SocioError::Database(_) => ErrorSeverity::Critical,
            SocioError::Migration(_) => ErrorSeverity::Critical,
            SocioError::Config(_) | SocioError::ConfigLoad(_) => ErrorSeverity::Critical,
            SocioError::PermissionDenied(_) => ErrorSeverity::Warning,
            SocioError::Authentication(_) => ErrorSeverity::Warning,
            SocioError::InvalidInput(_) => ErrorSeverity::Info,
            SocioError::NotFound(_) => ErrorSeverity::Info,
            SocioError::Conflict(_) => ErrorSeverity::Info,
            SocioError::Multipart(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Message safe to hand back to the client
    fn public_message(&self, status: StatusCode) -> String {
        match self {
            SocioError::Database(sqlx::Error::RowNotFound) => "Resource not found".to_string(),
            SocioError::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                "Resource already exists".to_string()
            }
            SocioError::Database(sqlx::Error::Database(db_err))
                if db_err.is_foreign_key_violation() || db_err.is_check_violation() =>
            {
                "Referenced resource does not exist or value is not allowed".to_string()
            }
            SocioError::AuthService(_) => "Authentication service error".to_string(),
            _ if status.is_server_error() => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for SocioError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                error!(status = status.as_u16(), severity = %self.severity(), error = %self, "Request failed")
            }
            ErrorSeverity::Warning => warn!(status = status.as_u16(), error = %self, "Request rejected"),
            ErrorSeverity::Info => debug!(status = status.as_u16(), error = %self, "Request rejected"),
        }

        let body = Json(json!({ "error": self.public_message(status) }));
        (status, body).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
