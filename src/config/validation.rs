//! Configuration validation module
//! 
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{SocioError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_storage_config(&settings.storage)?;
    validate_qr_config(&settings.qr)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(SocioError::Config(
            "Database URL is required".to_string()
        ));
    }
    
    if config.max_connections == 0 {
        return Err(SocioError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }
    
    if config.min_connections > config.max_connections {
        return Err(SocioError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }
    
    Ok(())
}

/// Validate identity provider configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    let has_secret = config.jwt_secret.as_deref().is_some_and(|s| !s.is_empty());
    let has_remote = config.supabase_url.as_deref().is_some_and(|s| !s.is_empty());

    if !has_secret && !has_remote {
        return Err(SocioError::Config(
            "Either auth.jwt_secret or auth.supabase_url must be configured".to_string()
        ));
    }

    if let Some(ref url) = config.supabase_url {
        if !url.is_empty() {
            url::Url::parse(url)?;
        }
    }

    Ok(())
}

/// Validate upload storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.upload_dir.is_empty() {
        return Err(SocioError::Config(
            "Upload directory is required".to_string()
        ));
    }

    if config.max_upload_bytes == 0 {
        return Err(SocioError::Config(
            "Max upload size must be greater than 0".to_string()
        ));
    }

    url::Url::parse(&config.public_base_url)?;

    Ok(())
}

/// Validate QR signing configuration
fn validate_qr_config(config: &super::QrConfig) -> Result<()> {
    if config.signing_secret.is_empty() {
        return Err(SocioError::Config(
            "QR signing secret is required".to_string()
        ));
    }

    if config.size < 21 {
        return Err(SocioError::Config(
            "QR size must be at least 21 pixels".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SocioError::Config(
            "Log level is required".to_string()
        ));
    }
    
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SocioError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }
    
    Ok(())
}
