//! User model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub auth_uuid: Option<String>,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_organiser: bool,
    pub course: Option<String>,
    pub register_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub auth_uuid: Option<String>,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub register_number: Option<String>,
}

/// User object as handed over by the identity provider's client SDK
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthClientUser {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<Value>,
}

/// Body of `POST /api/users`
#[derive(Debug, Clone, Deserialize)]
pub struct SyncUserRequest {
    pub user: Option<AuthClientUser>,
}

impl AuthClientUser {
    fn metadata_str(&self, key: &str) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Display name, preferring the explicit name over provider metadata
    pub fn display_name(&self) -> Option<String> {
        self.name
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.metadata_str("full_name"))
    }

    pub fn register_number(&self) -> Option<String> {
        self.metadata_str("register_number")
    }

    /// Avatar lookup order: metadata avatar, metadata picture, top-level fields
    pub fn avatar(&self) -> Option<String> {
        self.metadata_str("avatar_url")
            .or_else(|| self.metadata_str("picture"))
            .or_else(|| self.avatar_url.clone().filter(|s| !s.is_empty()))
            .or_else(|| self.picture.clone().filter(|s| !s.is_empty()))
    }
}
