//! Server configuration, loaded from the environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

const DEFAULT_PORT: i64 = 5000;
const DEFAULT_MAX_UPLOAD_BYTES: i64 = 5 * 1024 * 1024;

/// Runtime configuration, read from `ANALYZER_*` environment variables
/// with working defaults (e.g. `ANALYZER_PORT`, `ANALYZER_MODEL_PATH`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub blocklist_path: PathBuf,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        let cfg = Config::builder()
            .set_default("port", DEFAULT_PORT)?
            .set_default("model_path", "data/url_model.onnx")?
            .set_default("scaler_path", "data/scaler.json")?
            .set_default("blocklist_path", "data/blocklist.db")?
            .set_default("max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES)?
            .add_source(Environment::with_prefix("ANALYZER"))
            .build()
            .context("cannot assemble configuration")?;

        cfg.try_deserialize().context("configuration is malformed")
    }
}
