//! # Cadence API Server
//!
//! HTTP entry point for the Cadence task tracker: loads configuration,
//! connects the database pool, runs migrations and serves the Axum router
//! until interrupted.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/cadence cargo run -p cadence-api
//! ```

use cadence_api::app::{build_router, AppState};
use cadence_api::config::Config;
use cadence_store::db::migrations::run_migrations;
use cadence_store::db::pool::{create_pool, DatabaseConfig};
use cadence_store::store::TaskStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_api=debug,cadence_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Cadence API Server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let state = AppState::new(TaskStore::new(pool), config.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
