mod config;
mod dispatcher;
mod error;
mod handlers;
mod models;
mod rate_limit;
mod router;
mod state;
mod sweeper;

use config::GatewayConfig;
use router::create_router;
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting swipe gateway");

    let config = GatewayConfig::from_env()?;
    let source = config.candidate_source()?;
    tracing::info!(
        candidates = source.len(),
        idle_grace_secs = config.session.idle_grace.as_secs(),
        "Configuration loaded"
    );

    let state = AppState::new(&config, Arc::new(source));
    let _sweeper = sweeper::spawn_idle_sweeper(state.registry.clone(), config.sweep_interval);

    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
