//! In-process application for HTTP level tests
//!
//! Builds the real router over test settings and drives it with
//! `tower::ServiceExt::oneshot`, so no port is bound.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use socio::config::Settings;
use socio::database::{create_lazy_pool, DatabaseConfig, DatabasePool};
use socio::{build_router, AppState, SharedState};

use super::database_helper::TestDatabase;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-with-at-least-thirty-two-bytes";
pub const TEST_QR_SECRET: &str = "test-qr-signing-secret";
const BOUNDARY: &str = "socio-test-boundary";

/// A file part of a multipart request
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

pub struct TestApp {
    pub state: SharedState,
    pub router: Router,
    pub upload_dir: TempDir,
}

impl TestApp {
    /// App whose database is unreachable; only paths that never query succeed
    pub fn offline() -> Self {
        Self::offline_with(|_| {})
    }

    /// Offline app with adjusted settings
    pub fn offline_with(configure: impl FnOnce(&mut Settings)) -> Self {
        let config = DatabaseConfig {
            url: "mysql://socio@127.0.0.1:1/unreachable".to_string(),
            acquire_timeout: Duration::from_secs(1),
            min_connections: 0,
            ..DatabaseConfig::default()
        };
        let pool = create_lazy_pool(&config).expect("Failed to create lazy pool");
        Self::with_pool(pool, configure)
    }

    pub fn with_database(db: &TestDatabase) -> Self {
        Self::with_pool(db.pool.clone(), |_| {})
    }

    fn with_pool(pool: DatabasePool, configure: impl FnOnce(&mut Settings)) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
        let mut settings = test_settings(&upload_dir);
        configure(&mut settings);
        let state = AppState::new(settings, pool).expect("Failed to build state").shared();
        let router = build_router(state.clone());

        Self { state, router, upload_dir }
    }

    /// Send a request with an optional bearer token and JSON body
    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Send a JSON request whose body is taken verbatim
    pub async fn request_raw(&self, method: Method, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = builder
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Send a multipart form
    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        fields: &[(String, String)],
        files: &[FilePart<'_>],
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = builder
            .body(Body::from(multipart_body(fields, files)))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Raw GET returning the body bytes
    pub async fn get_bytes(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request");
        let response = self.router.clone().oneshot(request).await.expect("Router failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, bytes.to_vec())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("Router failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

fn test_settings(upload_dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = Some(TEST_JWT_SECRET.to_string());
    settings.qr.signing_secret = TEST_QR_SECRET.to_string();
    settings.storage.upload_dir = upload_dir.path().to_string_lossy().into_owned();
    settings.storage.public_base_url = "http://localhost:8000".to_string();
    settings
}

/// Session token signed the way the identity provider signs them
pub fn session_token(sub: &str, email: Option<&str>) -> String {
    let claims = json!({
        "sub": sub,
        "email": email,
        "aud": "authenticated",
        "exp": chrono::Utc::now().timestamp() + 3600,
        "user_metadata": {},
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()))
        .expect("Failed to sign token")
}

fn multipart_body(fields: &[(String, String)], files: &[FilePart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }

    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
