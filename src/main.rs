use anyhow::Context;
use tracing_subscriber::EnvFilter;

use rental_kpi_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = rental_kpi_api::config::config().clone().resolve_secrets()?;
    tracing::info!("Starting Rental KPI API in {:?} mode", config.environment);

    let port = config.server.port;
    let state = AppState::new(config).await?;
    state.bootstrap_admin().await?;

    // Warm the dataset so a bad workbook shows up in the startup log
    if let Err(e) = state.datasets.snapshot().await {
        tracing::warn!("Booking dataset not loaded yet: {}", e);
    }

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Rental KPI API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}

