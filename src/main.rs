mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    tracing::info!("worker-kv-proxy starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = store::from_config(&config)?;

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let state = AppState {
        store,
        config: Arc::new(config),
    };

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
