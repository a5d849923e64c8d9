use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use focusflow::clock::SystemClock;
use focusflow::config::Config;
use focusflow::server::{self, AppState};
use focusflow::state::Dashboard;
use focusflow::store::FileStore;
use focusflow::ticker::Ticker;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let store = Arc::new(FileStore::new(&config.data_dir));
    let dashboard = Dashboard::load(store, Arc::new(SystemClock));
    let state = AppState::new(dashboard, Ticker::new(config.tick_period()));
    let ticker = state.ticker.clone();

    let app = server::app(state, &config.static_dir);

    info!(data_dir = %config.data_dir.display(), "using data directory");
    info!("server running at http://{}", config.addr);
    info!("static files: http://{}/", config.addr);
    info!("api base:     http://{}/api", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("server error")?;

    ticker.disarm();
    info!("shut down");
    Ok(())
}
