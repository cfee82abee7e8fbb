//! Application settings management
//! 
//! This module defines the configuration structure and provides methods
//! for loading settings from config files and `SOCIO__*` environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub qr: QrConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Identity provider configuration.
///
/// When `jwt_secret` is set tokens are verified locally, otherwise every
/// token is checked against `{supabase_url}/auth/v1/user`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub jwt_secret: Option<String>,
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
}

/// Local upload storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

/// QR payload signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QrConfig {
    pub signing_secret: String,
    #[serde(default = "default_qr_size")]
    pub size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file; rotated daily with the date appended to its name
    pub file_path: Option<String>,
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}

fn default_qr_size() -> u32 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec![],
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            jwt_secret: None,
            jwt_audience: default_jwt_audience(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            public_base_url: "http://localhost:8000".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
        }
    }
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("SOCIO")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::SocioError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "mysql://root@localhost:3306/socio_db".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            qr: QrConfig {
                signing_secret: String::new(),
                size: default_qr_size(),
            },
            logging: LoggingConfig::default(),
        }
    }
}
