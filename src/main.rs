//! Socio backend
//!
//! Main application entry point

use tracing::{error, info};

use socio::{
    config::Settings,
    database::connection::{create_pool, run_migrations, DatabaseConfig},
    server,
    state::AppState,
    utils::logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", socio::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;

    run_migrations(&db_pool).await?;

    // Initialize services
    info!("Initializing services...");
    let state = AppState::new(settings, db_pool)?.shared();

    if let Err(e) = server::serve(state).await {
        error!(error = %e, "Server stopped with an error");
        return Err(e.into());
    }

    Ok(())
}
