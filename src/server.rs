//! HTTP server assembly
//!
//! Builds the axum router over the shared state and runs it until a
//! shutdown signal arrives.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::handlers::{attendance, events, fests, health, notifications, registrations, uploads, users};
use crate::middleware::{optional_auth, require_auth, trace_layer};
use crate::state::SharedState;
use crate::utils::errors::{SocioError, Result};

/// Build the application router
pub fn build_router(state: SharedState) -> Router {
    let storage = &state.settings.storage;
    let body_limit = storage.max_upload_bytes;

    // Every route here needs a session
    let inbox = Router::new()
        .route(
            "/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route("/notifications/bulk", post(notifications::create_bulk_notifications))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .route("/notifications/:id", axum::routing::delete(notifications::delete_notification))
        .route("/upload/:bucket", post(uploads::upload_file))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Writes authenticate through the `AuthUser` extractor, which picks up
    // the caller attached by `optional_auth`
    let api = Router::new()
        .route("/users", get(users::list_users).post(users::sync_user))
        .route("/users/:email", get(users::get_user))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:eventId",
            get(events::get_event).put(events::update_event).delete(events::delete_event),
        )
        .route("/events/:eventId/participants", get(attendance::list_participants))
        .route("/events/:eventId/attendance", post(attendance::mark_attendance))
        .route("/events/:eventId/attendance/stats", get(attendance::attendance_stats))
        .route("/events/:eventId/scan", post(attendance::scan_qr))
        .route("/events/:eventId/scan-logs", get(attendance::scan_logs))
        .route("/fests", get(fests::list_fests).post(fests::create_fest))
        .route(
            "/fests/:festId",
            get(fests::get_fest).put(fests::update_fest).delete(fests::delete_fest),
        )
        .route("/fests/:festId/events", get(fests::list_fest_events))
        .route("/registrations", get(registrations::list_registrations))
        .route(
            "/registrations/:registrationId",
            get(registrations::get_registration).delete(registrations::delete_registration),
        )
        .route("/registrations/:registrationId/qr-code", get(registrations::get_registration_qr))
        .route("/register", post(registrations::register))
        .route_layer(middleware::from_fn_with_state(state.clone(), optional_auth))
        .merge(inbox);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&storage.upload_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors_layer(&state.settings.server))
        .layer(trace_layer())
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Bind the configured address and serve until ctrl-c or SIGTERM
pub async fn serve(state: SharedState) -> Result<()> {
    let server = &state.settings.server;
    let address: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| SocioError::Config(format!("Invalid listen address: {}", e)))?;

    let app = build_router(state.clone());

    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
