//! Server configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name attached to every structured log line
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// Address the HTTP listener binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Forecast model artifact (`.json` or `.onnx`)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Expected SHA-256 of the model artifact, hex encoded
    #[serde(default)]
    pub model_sha256: Option<String>,

    /// Refuse to start when the model cannot be loaded
    #[serde(default = "default_require_model")]
    pub require_model: bool,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "ecoflow".to_string())
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/waste_generation_forecasting_model.json")
}

fn default_require_model() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            bind_address: default_bind_address(),
            port: default_port(),
            model_path: default_model_path(),
            model_sha256: None,
            require_model: default_require_model(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional `ecoflow.toml` and `ECOFLOW_*`
    /// environment variables, the latter taking precedence
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("ecoflow").required(false))
            .add_source(config::Environment::with_prefix("ECOFLOW").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
