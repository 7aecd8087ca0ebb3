use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::{Config, ForecastResolver, SqliteOverrideStore, Validator, provider_from_config};
use weather_server::{AppState, weather_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_level.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let provider = provider_from_config(&cfg)?;
    let database_url = cfg.database_url()?;
    let store = SqliteOverrideStore::connect(&database_url)
        .await
        .with_context(|| format!("Failed to open override store at {database_url}"))?;

    info!(
        database_url = %database_url,
        listen_addr = %cfg.listen_addr,
        timeout_secs = cfg.timeout_secs,
        loglevel = %cfg.log_level
    );

    let resolver = ForecastResolver::new(Arc::new(provider), Arc::new(store), Validator::default());
    let app = weather_router(AppState::new(resolver));

    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.listen_addr))?;
    info!("HTTP server listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
