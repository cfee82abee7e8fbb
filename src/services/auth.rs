//! Authentication service implementation
//!
//! This service verifies Supabase session tokens (locally with the project's
//! JWT secret, or remotely against the Supabase auth API), resolves the caller
//! to a local user and enforces the organiser and ownership rules.

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use crate::config::AuthConfig;
use crate::database::repositories::UserRepository;
use crate::models::User;
use crate::utils::errors::{SocioError, Result};

pub const MISSING_TOKEN: &str = "No valid authorization token provided";
pub const INVALID_TOKEN: &str = "Invalid or expired token";
pub const USER_NOT_FOUND: &str = "User not found in local database";
pub const ORGANISER_REQUIRED: &str = "Access denied: Organiser privileges required";
pub const OWNERSHIP_REQUIRED: &str = "Access denied: You can only modify your own resources";

/// Identity of an authenticated caller as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
}

/// Where session tokens are checked
#[derive(Clone)]
enum Verifier {
    Local { key: DecodingKey, validation: Validation },
    Remote { base_url: String, anon_key: Option<String> },
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verifier::Local { .. } => f.write_str("Verifier::Local"),
            Verifier::Remote { base_url, .. } => {
                f.debug_struct("Verifier::Remote").field("base_url", base_url).finish()
            }
        }
    }
}

/// Authentication service for token verification and access control
#[derive(Clone, Debug)]
pub struct AuthService {
    verifier: Verifier,
    http: reqwest::Client,
}

impl AuthService {
    /// Create a new AuthService. A configured JWT secret takes precedence over
    /// remote verification.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let verifier = match (&config.jwt_secret, &config.supabase_url) {
            (Some(secret), _) if !secret.is_empty() => {
                let mut validation = Validation::new(Algorithm::HS256);
                validation.set_audience(&[config.jwt_audience.as_str()]);
                Verifier::Local {
                    key: DecodingKey::from_secret(secret.as_bytes()),
                    validation,
                }
            }
            (_, Some(url)) if !url.is_empty() => Verifier::Remote {
                base_url: url.trim_end_matches('/').to_string(),
                anon_key: config.supabase_anon_key.clone(),
            },
            _ => {
                return Err(SocioError::Config(
                    "Either auth.jwt_secret or auth.supabase_url must be configured".to_string(),
                ))
            }
        };

        Ok(Self {
            verifier,
            http: reqwest::Client::new(),
        })
    }

    /// Verify a session token and return the caller's identity
    pub async fn verify_token(&self, token: &str) -> Result<AuthUser> {
        match &self.verifier {
            Verifier::Local { key, validation } => {
                let data = decode::<SessionClaims>(token, key, validation).map_err(|e| {
                    debug!(error = %e, "Session token rejected");
                    SocioError::Authentication(INVALID_TOKEN.to_string())
                })?;

                Ok(AuthUser {
                    id: data.claims.sub,
                    email: data.claims.email,
                    metadata: data.claims.user_metadata,
                })
            }
            Verifier::Remote { base_url, anon_key } => {
                let mut request = self
                    .http
                    .get(format!("{}/auth/v1/user", base_url))
                    .bearer_auth(token);
                if let Some(key) = anon_key {
                    request = request.header("apikey", key);
                }

                let response = request.send().await.map_err(|e| {
                    warn!(error = %e, "Supabase auth request failed");
                    SocioError::AuthService(e.to_string())
                })?;

                if !response.status().is_success() {
                    debug!(status = response.status().as_u16(), "Supabase rejected session token");
                    return Err(SocioError::Authentication(INVALID_TOKEN.to_string()));
                }

                let user: RemoteUser = response
                    .json()
                    .await
                    .map_err(|_| SocioError::Authentication(INVALID_TOKEN.to_string()))?;

                Ok(AuthUser {
                    id: user.id,
                    email: user.email,
                    metadata: user.user_metadata,
                })
            }
        }
    }

    /// Verify the bearer token carried by a request
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser> {
        let token = bearer_token(headers)?;
        self.verify_token(token).await
    }

    /// Load the local user row for an authenticated caller
    pub async fn current_user(&self, users: &UserRepository, auth: &AuthUser) -> Result<User> {
        users
            .find_by_auth_uuid(&auth.id)
            .await?
            .ok_or_else(|| SocioError::NotFound(USER_NOT_FOUND.to_string()))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| SocioError::Authentication(MISSING_TOKEN.to_string()))
}

pub fn require_organiser(user: &User) -> Result<()> {
    if user.is_organiser {
        Ok(())
    } else {
        Err(SocioError::PermissionDenied(ORGANISER_REQUIRED.to_string()))
    }
}

/// Ownership is recorded as the owner's auth UUID
pub fn require_owner(resource_owner: Option<&str>, auth: &AuthUser) -> Result<()> {
    match resource_owner {
        Some(owner) if owner == auth.id => Ok(()),
        _ => Err(SocioError::PermissionDenied(OWNERSHIP_REQUIRED.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use wiremock::matchers::{header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET: &str = "super-secret-jwt-token-with-at-least-32-characters";

    fn local_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: Some(SECRET.to_string()),
            ..AuthConfig::default()
        }
    }

    fn session_token(secret: &str, aud: &str, exp_offset: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + exp_offset;
        let claims = json!({
            "sub": "8f14e45f-ceea-467a-9af0-fd2d4f5d2c3a",
            "email": "asha@college.edu",
            "aud": aud,
            "exp": exp,
            "user_metadata": {"full_name": "Asha Rao"}
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn organiser(is_organiser: bool) -> User {
        User {
            id: "u1".into(),
            auth_uuid: Some("8f14e45f-ceea-467a-9af0-fd2d4f5d2c3a".into()),
            email: "asha@college.edu".into(),
            name: Some("Asha Rao".into()),
            avatar_url: None,
            is_organiser,
            course: None,
            register_number: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
        assert_matches!(bearer_token(&HeaderMap::new()), Err(SocioError::Authentication(m)) if m == MISSING_TOKEN);
        assert_matches!(bearer_token(&headers_with("Basic abc")), Err(SocioError::Authentication(_)));
        assert_matches!(bearer_token(&headers_with("Bearer ")), Err(SocioError::Authentication(_)));
    }

    #[test]
    fn test_requires_some_verifier() {
        let config = AuthConfig::default();
        assert_matches!(AuthService::new(&config), Err(SocioError::Config(_)));
    }

    #[tokio::test]
    async fn test_local_verification() {
        let service = AuthService::new(&local_config()).unwrap();
        let user = service.verify_token(&session_token(SECRET, "authenticated", 3600)).await.unwrap();

        assert_eq!(user.id, "8f14e45f-ceea-467a-9af0-fd2d4f5d2c3a");
        assert_eq!(user.email.as_deref(), Some("asha@college.edu"));
        assert_eq!(user.metadata["full_name"], "Asha Rao");
    }

    #[tokio::test]
    async fn test_local_verification_rejects_bad_tokens() {
        let service = AuthService::new(&local_config()).unwrap();

        let wrong_secret = session_token("another-secret-that-is-also-long-enough", "authenticated", 3600);
        assert_matches!(service.verify_token(&wrong_secret).await, Err(SocioError::Authentication(m)) if m == INVALID_TOKEN);

        let wrong_audience = session_token(SECRET, "anon", 3600);
        assert_matches!(service.verify_token(&wrong_audience).await, Err(SocioError::Authentication(_)));

        let expired = session_token(SECRET, "authenticated", -3600);
        assert_matches!(service.verify_token(&expired).await, Err(SocioError::Authentication(_)));

        assert_matches!(service.verify_token("garbage").await, Err(SocioError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_remote_verification() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header_matcher("authorization", "Bearer good-token"))
            .and(header_matcher("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "remote-user-id",
                "email": "dev@college.edu",
                "user_metadata": {"avatar_url": "https://cdn/avatar.png"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "invalid JWT"})))
            .with_priority(10)
            .mount(&server)
            .await;

        let config = AuthConfig {
            supabase_url: Some(server.uri()),
            supabase_anon_key: Some("anon-key".to_string()),
            ..AuthConfig::default()
        };
        let service = AuthService::new(&config).unwrap();

        let user = service.authenticate(&headers_with("Bearer good-token")).await.unwrap();
        assert_eq!(user.id, "remote-user-id");
        assert_eq!(user.metadata["avatar_url"], "https://cdn/avatar.png");

        assert_matches!(
            service.verify_token("bad-token").await,
            Err(SocioError::Authentication(m)) if m == INVALID_TOKEN
        );
    }

    #[test]
    fn test_role_and_ownership_checks() {
        assert!(require_organiser(&organiser(true)).is_ok());
        assert_matches!(require_organiser(&organiser(false)), Err(SocioError::PermissionDenied(m)) if m == ORGANISER_REQUIRED);

        let auth = AuthUser { id: "owner".into(), email: None, metadata: Value::Null };
        assert!(require_owner(Some("owner"), &auth).is_ok());
        assert_matches!(require_owner(Some("someone-else"), &auth), Err(SocioError::PermissionDenied(m)) if m == OWNERSHIP_REQUIRED);
        assert_matches!(require_owner(None, &auth), Err(SocioError::PermissionDenied(_)));
    }
}
