use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use bgmi_api::app::{app, AppState};
use bgmi_api::config::AppConfig;
use bgmi_api::controllers::LibraryControllers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up BGMI_ADMIN_TOKEN etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(AppConfig::from_env());
    tracing::info!("starting bgmi-api in {:?} mode", config.environment);
    if config.security.admin_token.is_empty() {
        tracing::warn!("BGMI_ADMIN_TOKEN is not set; all write actions will be rejected");
    }

    let state = AppState {
        config: config.clone(),
        controllers: Arc::new(LibraryControllers::new()),
    };
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("bgmi-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
