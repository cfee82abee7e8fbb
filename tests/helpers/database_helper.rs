//! Test database helper utilities
//!
//! Tests that need MySQL use `TEST_DATABASE_URL` when it is set and fall back
//! to a throwaway container. When neither is available the helper returns
//! `None` and the test skips itself.

use std::sync::Once;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mysql::Mysql;
use socio::models::user::{CreateUserRequest, User};
use socio::database::UserRepository;

static INIT: Once = Once::new();

/// MySQL database with the application schema applied
pub struct TestDatabase {
    pub pool: MySqlPool,
    pub database_url: String,
    _container: Option<ContainerAsync<Mysql>>,
}

impl TestDatabase {
    /// Connect and migrate, or `None` when no database can be reached
    pub async fn try_new() -> Option<Self> {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        });

        let (database_url, container) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => match Self::start_container().await {
                Some((url, container)) => (url, Some(container)),
                None => {
                    eprintln!("No MySQL available (set TEST_DATABASE_URL or start Docker); skipping");
                    return None;
                }
            },
        };

        let pool = match MySqlPoolOptions::new().max_connections(5).connect(&database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                eprintln!("Could not connect to {}: {}; skipping", database_url, e);
                return None;
            }
        };

        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            eprintln!("Migrations failed: {}; skipping", e);
            return None;
        }

        let db = Self {
            pool,
            database_url,
            _container: container,
        };
        db.cleanup().await.ok()?;
        Some(db)
    }

    async fn start_container() -> Option<(String, ContainerAsync<Mysql>)> {
        let container = Mysql::default().start().await.ok()?;
        let port = container.get_host_port_ipv4(3306).await.ok()?;
        Some((format!("mysql://root@127.0.0.1:{}/test", port), container))
    }

    /// Remove all rows, children first
    pub async fn cleanup(&self) -> Result<(), sqlx::Error> {
        for table in [
            "attendance_status",
            "qr_scan_logs",
            "notifications",
            "registrations",
            "events",
            "fests",
            "users",
        ] {
            sqlx::query(&format!("DELETE FROM {}", table)).execute(&self.pool).await?;
        }

        Ok(())
    }

    /// Count records in a table
    pub async fn count_records(&self, table: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
    }

    /// Insert a local user linked to `auth_uuid`
    pub async fn create_test_user(&self, auth_uuid: &str, email: &str, is_organiser: bool) -> User {
        let users = UserRepository::new(self.pool.clone());
        let user = users
            .create(CreateUserRequest {
                auth_uuid: Some(auth_uuid.to_string()),
                email: email.to_string(),
                name: "Test User".to_string(),
                avatar_url: None,
                register_number: None,
            })
            .await
            .expect("Failed to create test user");

        if is_organiser {
            users.set_organiser(email, true).await.expect("Failed to promote organiser");
            return users
                .find_by_email(email)
                .await
                .expect("Failed to reload user")
                .expect("User disappeared");
        }

        user
    }

    /// `total_participants` of an event
    pub async fn total_participants(&self, event_id: &str) -> i64 {
        sqlx::query_scalar::<_, i32>("SELECT total_participants FROM events WHERE event_id = ?")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map(i64::from)
            .expect("Failed to read total_participants")
    }
}
