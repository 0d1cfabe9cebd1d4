// crates/server/src/main.rs
//! Field intelligence server binary.
//!
//! Resolves configuration once, opens the store read-only (detecting its
//! schema layout unless one is configured), then serves the API.

use anyhow::{Context, Result};
use clap::Parser;
use fieldintel_db::Database;
use fieldintel_server::{create_app, init_metrics, Cli, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,fieldintel_server=info,fieldintel_db=info".into()),
        )
        .compact()
        .init();

    let config = ServerConfig::resolve(Cli::parse())?;

    init_metrics();

    let db = Database::open(&config.db_path, config.schema)
        .await
        .with_context(|| format!("opening store {}", config.db_path.display()))?;

    match &config.static_dir {
        Some(dir) => info!(static_dir = %dir.display(), "Serving dashboard bundle"),
        None => info!("No dashboard bundle configured; API only"),
    }

    let app = create_app(db, config.static_dir.clone());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Field intelligence API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
