use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use ragpdf_backend::core;
use ragpdf_backend::core::config::AppConfig;
use ragpdf_backend::server;
use ragpdf_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    core::logging::init(&config.logging.dir);
    tracing::info!("Configuration: {}", config.redacted());

    let bind_addr = config.bind_addr();
    let state = AppState::initialize(config).await?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
