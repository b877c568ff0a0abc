//! NovaApp Adapter - Headless Daemon
//!
//! Serves an OpenAI-compatible API on /v1/* backed by the NovaApp web
//! backend, plus a small static test UI.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod cli;
mod logging;
mod router;

use cli::Cli;
use novaapp_core::modules::config::load_config;
use novaapp_core::Adapter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init_logging(&cli.log_dir, &cli.log_level)?;

    info!("NovaApp Adapter v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let adapter = Arc::new(Adapter::new(config).context("Failed to initialize adapter")?);

    info!("Loaded {} credential(s)", adapter.config().credentials.len());
    if adapter.config().effective_api_key().is_none() {
        info!("API master key not set; /v1 endpoints are open");
    }

    let app = router::build_router(Arc::clone(&adapter), &cli.static_dir);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);
    info!("Test UI available at http://{}/", addr);
    info!("Proxy endpoints at http://{}/v1/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
