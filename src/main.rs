//! Server binary for the MSK Suggestion Board backend.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use board_backend::config::Config;
use board_backend::db::{self, Repository};
use board_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting MSK Suggestion Board Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (BOARD_API_PSK). Authentication is disabled!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Import the seed fixture into an empty store
    if let Some(seed_path) = &config.seed_path {
        if repo.is_empty().await? {
            tracing::info!("Importing seed fixture from {:?}", seed_path);
            let seed = db::load_seed(seed_path).await?;
            let (employees, suggestions) = seed.into_records();
            tracing::info!(
                "Seeding {} employees and {} suggestions",
                employees.len(),
                suggestions.len()
            );
            repo.import_seed(&employees, &suggestions).await?;
        } else {
            tracing::debug!("Store is not empty, skipping seed import");
        }
    }

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
