use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod config;
mod forecast;
mod render;
mod routes;
mod themes;

use cache::spawn_sweeper;
use config::{Config, LogFormat};
use routes::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let bind_addr = config.bind_addr.clone();
    let sweep_interval = config.cache_cleanup_interval;

    let state = AppState::from_config(config)?;
    tracing::info!(
        ttl_secs = state.weather_cache.default_ttl().as_secs(),
        sweep_secs = sweep_interval.as_secs(),
        theme = ?state.config.theme,
        "Weather cache ready"
    );
    let _sweeper = spawn_sweeper(state.weather_cache.clone(), sweep_interval);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server starting on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kindle_weather=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
