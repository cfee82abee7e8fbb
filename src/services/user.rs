//! User service implementation
//!
//! This service mirrors identity-provider accounts into the local users table
//! and serves user lookups.

use tracing::{info, debug};
use crate::database::repositories::UserRepository;
use crate::models::user::{AuthClientUser, CreateUserRequest, SyncUserRequest, User};
use crate::utils::errors::{SocioError, Result};
use crate::utils::helpers::{non_blank, split_register_number};
use crate::utils::logging::log_user_action;

pub const DEFAULT_USER_NAME: &str = "New User";

/// Result of syncing a signed-in account
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub user: User,
    pub is_new: bool,
    pub message: &'static str,
}

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    /// Create the local user for a signed-in account, or attach the account's
    /// auth UUID to an existing row.
    pub async fn sync_user(&self, request: SyncUserRequest) -> Result<SyncOutcome> {
        let client = request
            .user
            .filter(|u| u.email.as_deref().is_some_and(|e| !e.trim().is_empty()))
            .ok_or_else(|| SocioError::InvalidInput("Invalid user data: email is required".to_string()))?;
        let create_request = build_create_request(&client)?;
        let email = create_request.email.clone();
        let auth_uuid = create_request.auth_uuid.clone();

        debug!(email = %email, "Syncing user");

        if let Some(existing) = self
            .user_repository
            .find_by_email_or_auth_uuid(&email, auth_uuid.as_deref())
            .await?
        {
            if existing.auth_uuid.is_none() {
                if let Some(auth_uuid) = auth_uuid {
                    let user = self.user_repository.set_auth_uuid(&existing.email, &auth_uuid).await?;
                    log_user_action(&user.email, "auth_uuid_linked", None);
                    return Ok(SyncOutcome {
                        user,
                        is_new: false,
                        message: "User updated with auth UUID.",
                    });
                }
            }

            return Ok(SyncOutcome {
                user: existing,
                is_new: false,
                message: "User already exists.",
            });
        }

        let user = self.user_repository.create(create_request).await?;
        info!(user_id = %user.id, email = %user.email, "New user created");
        log_user_action(&user.email, "created", user.register_number.as_deref());

        Ok(SyncOutcome {
            user,
            is_new: true,
            message: "User created successfully.",
        })
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repository.list().await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| SocioError::NotFound("User not found".to_string()))
    }
}

/// Derive the row to insert for a client-side user object
pub fn build_create_request(client: &AuthClientUser) -> Result<CreateUserRequest> {
    let email = non_blank(client.email.clone())
        .map(|e| e.trim().to_string())
        .ok_or_else(|| SocioError::InvalidInput("Invalid user data: email is required".to_string()))?;

    let raw_name = client.display_name().unwrap_or_else(|| DEFAULT_USER_NAME.to_string());
    let (name, register_number) = match client.register_number() {
        Some(number) => (raw_name, Some(number)),
        None => split_register_number(&raw_name),
    };

    Ok(CreateUserRequest {
        auth_uuid: non_blank(client.id.clone()),
        email,
        name,
        avatar_url: client.avatar(),
        register_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn client(value: serde_json::Value) -> AuthClientUser {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_register_number_split_from_name() {
        let request = build_create_request(&client(json!({
            "id": "auth-1",
            "email": "meera@college.edu",
            "user_metadata": {"full_name": "Meera Iyer 2341567", "avatar_url": "https://cdn/m.png"}
        })))
        .unwrap();

        assert_eq!(request.name, "Meera Iyer");
        assert_eq!(request.register_number.as_deref(), Some("2341567"));
        assert_eq!(request.auth_uuid.as_deref(), Some("auth-1"));
        assert_eq!(request.avatar_url.as_deref(), Some("https://cdn/m.png"));
    }

    #[test]
    fn test_explicit_register_number_keeps_name() {
        let request = build_create_request(&client(json!({
            "email": "meera@college.edu",
            "name": "Meera 2341567",
            "user_metadata": {"register_number": "999"}
        })))
        .unwrap();

        assert_eq!(request.name, "Meera 2341567");
        assert_eq!(request.register_number.as_deref(), Some("999"));
        assert_eq!(request.auth_uuid, None);
    }

    #[test]
    fn test_defaults_and_validation() {
        let request = build_create_request(&client(json!({"email": "anon@college.edu"}))).unwrap();
        assert_eq!(request.name, DEFAULT_USER_NAME);
        assert_eq!(request.register_number, None);

        assert_matches!(
            build_create_request(&client(json!({"name": "No Email"}))),
            Err(SocioError::InvalidInput(m)) if m == "Invalid user data: email is required"
        );
    }
}
