//! Subcommand implementations

pub mod bins;
pub mod forecast;
pub mod insights;
pub mod interactive;
pub mod route;

use crate::client::ApiClient;
use anyhow::{Context, Result};
use ecoflow_lib::{
    observability::{ServiceMetrics, StructuredLogger},
    predictor::{load_forecaster, ForecastService},
};
use std::path::{Path, PathBuf};

/// Instance name attached to the library's log events
const LOG_INSTANCE: &str = "ecoflow-cli";

/// Where predict, route and bin lookups are answered
pub enum Backend {
    /// In-process model and reference tables
    Local { model_path: PathBuf },
    /// A running `ecoflow-server`
    Remote(ApiClient),
}

/// Load the model artifact into a forecast service
pub fn load_local_service(model_path: &Path) -> Result<ForecastService> {
    let loaded = load_forecaster(model_path, None)
        .with_context(|| format!("Failed to load forecast model {}", model_path.display()))?;

    Ok(ForecastService::new(
        loaded.forecaster,
        ServiceMetrics::new(),
        StructuredLogger::new(LOG_INSTANCE),
    ))
}

/// Forecast service that refuses forecasts but still validates input
pub fn service_without_model() -> ForecastService {
    ForecastService::without_model(ServiceMetrics::new(), StructuredLogger::new(LOG_INSTANCE))
}
