//! User repository implementation

use sqlx::MySqlPool;
use chrono::Utc;
use crate::models::user::{User, CreateUserRequest};
use crate::utils::errors::SocioError;
use crate::utils::helpers::generate_uuid;

const USER_COLUMNS: &str =
    "id, auth_uuid, email, name, avatar_url, is_organiser, course, register_number, created_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, SocioError> {
        let id = generate_uuid();

        sqlx::query(
            r#"
            INSERT INTO users (id, auth_uuid, email, name, avatar_url, is_organiser, course, register_number, created_at)
            VALUES (?, ?, ?, ?, ?, FALSE, NULL, ?, ?)
            "#
        )
        .bind(&id)
        .bind(request.auth_uuid)
        .bind(&request.email)
        .bind(request.name)
        .bind(request.avatar_url)
        .bind(request.register_number)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id)
            .await?
            .ok_or(SocioError::Database(sqlx::Error::RowNotFound))
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, SocioError> {
        let user = sqlx::query_as::<_, User>(
            &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS)
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, SocioError> {
        let user = sqlx::query_as::<_, User>(
            &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS)
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by identity provider id
    pub async fn find_by_auth_uuid(&self, auth_uuid: &str) -> Result<Option<User>, SocioError> {
        let user = sqlx::query_as::<_, User>(
            &format!("SELECT {} FROM users WHERE auth_uuid = ?", USER_COLUMNS)
        )
        .bind(auth_uuid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user matching either the email or a non-null auth uuid
    pub async fn find_by_email_or_auth_uuid(&self, email: &str, auth_uuid: Option<&str>) -> Result<Option<User>, SocioError> {
        let user = sqlx::query_as::<_, User>(
            &format!(
                "SELECT {} FROM users WHERE email = ? OR (auth_uuid IS NOT NULL AND auth_uuid = ?) LIMIT 1",
                USER_COLUMNS
            )
        )
        .bind(email)
        .bind(auth_uuid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Attach an identity provider id to an existing user
    pub async fn set_auth_uuid(&self, email: &str, auth_uuid: &str) -> Result<User, SocioError> {
        sqlx::query("UPDATE users SET auth_uuid = ? WHERE email = ?")
            .bind(auth_uuid)
            .bind(email)
            .execute(&self.pool)
            .await?;

        self.find_by_email(email)
            .await?
            .ok_or_else(|| SocioError::NotFound("User not found".to_string()))
    }

    /// Grant or revoke organiser privileges
    pub async fn set_organiser(&self, email: &str, is_organiser: bool) -> Result<bool, SocioError> {
        let result = sqlx::query("UPDATE users SET is_organiser = ? WHERE email = ?")
            .bind(is_organiser)
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, SocioError> {
        let users = sqlx::query_as::<_, User>(
            &format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLUMNS)
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
