//! URL risk analyzer HTTP server.
//!
//! Loads the model artifact and blocklist once at startup, then serves the
//! analysis API until shutdown.

mod config;
mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use analyzer_core::blocklist::BlocklistStore;
use analyzer_core::inference::{OnnxOracle, Standardizer};
use analyzer_core::pipeline::Analyzer;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = ServerConfig::load()?;

    info!(model = %cfg.model_path.display(), "loading model artifact");
    let oracle = Arc::new(OnnxOracle::load(&cfg.model_path)?);
    let standardizer = Standardizer::load(&cfg.scaler_path)?;
    let blocklist = BlocklistStore::open(&cfg.blocklist_path)?;

    let analyzer = Arc::new(Analyzer::new(blocklist, standardizer, oracle));
    let app = routes::router(analyzer, cfg.max_upload_bytes);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app).await.context("server stopped unexpectedly")
}
