//! EcoFlow server - waste forecasting, route lookup and bin status over HTTP

use anyhow::{Context, Result};
use ecoflow_lib::{
    health::{components, HealthRegistry},
    observability::{ServiceMetrics, StructuredLogger},
    predictor::{load_forecaster, ForecastService},
};
use ecoflow_server::{api, config::ServerConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting ecoflow-server");

    let config = ServerConfig::load()?;
    info!(
        instance = %config.instance_name,
        model_path = %config.model_path.display(),
        require_model = config.require_model,
        "Server configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::REFERENCE_TABLES).await;

    let metrics = ServiceMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);
    let model_path = config.model_path.display().to_string();

    let forecast = match load_forecaster(&config.model_path, config.model_sha256.as_deref()) {
        Ok(loaded) => {
            let version = loaded.forecaster.model_version().to_string();
            let kind = loaded.kind.to_string();
            logger.log_model_loaded(&model_path, &kind, &version, &loaded.checksum);
            metrics.set_model_info(&version, &kind);
            health_registry.register(components::FORECAST_MODEL).await;
            ForecastService::new(loaded.forecaster, metrics.clone(), logger.clone())
        }
        Err(err) if config.require_model => {
            return Err(err).with_context(|| format!("Cannot start without model {}", model_path));
        }
        Err(err) => {
            let reason = format!("{:#}", err);
            logger.log_model_unavailable(&model_path, &reason);
            health_registry
                .set_degraded(components::FORECAST_MODEL, reason)
                .await;
            ForecastService::without_model(metrics.clone(), logger.clone())
        }
    };

    logger.log_startup(SERVICE_VERSION, forecast.model_version());

    let forecast = Arc::new(forecast);
    let app_state = Arc::new(api::AppState::new(
        forecast.clone(),
        health_registry.clone(),
        metrics,
        logger.clone(),
    ));

    health_registry.set_ready(true).await;

    let api_handle = tokio::spawn(api::serve(config.listen_addr(), app_state));

    tokio::select! {
        result = api_handle => {
            result.context("API server task panicked")??;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            logger.log_shutdown("SIGINT received");
        }
    }

    if let Some(stats) = forecast.inference_stats() {
        info!(
            total_inferences = stats.total_inferences,
            slow_inferences = stats.slow_inferences,
            "Inference summary"
        );
    }
    info!("Shutting down");
    Ok(())
}
