use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse_server::{build_router, config::Settings, db::Database, seed, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::new().context("Failed to load settings")?;
    tracing::info!("Starting in {} mode", settings.environment.as_str());

    let db = Database::new(&settings.database.path).context("Failed to create database")?;
    db.initialize()?;
    tracing::info!("Database initialized at {}", settings.database.path);

    if settings.database.seed_demo_data {
        let inserted = seed::seed_demo_data(&db)?;
        tracing::info!("Seeded {} demo users", inserted);
    }

    let app = build_router(AppState::from_settings(db, &settings));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Failed to parse server address")?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
