//! Bookshelf Server - Author and Book catalog
//!
//! A Rust REST API server for a small library catalog.

use std::net::SocketAddr;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_server::{api, config::AppConfig, repository::Repository, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config);

    tracing::info!("Starting Bookshelf Server v{}", env!("CARGO_PKG_VERSION"));

    let repository = if config.database.in_memory {
        tracing::warn!("Using in-memory storage, data will not survive a restart");
        Repository::in_memory()
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect(&config.database.url)
            .await
            .context("Failed to connect to database")?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database migrations completed");

        Repository::new(pool)
    };

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let app = api::create_router(AppState::new(config, repository));

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("bookshelf_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
