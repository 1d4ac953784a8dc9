//! Observability infrastructure for the waste management service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, prediction counts, request counts, model info)
//! - Structured JSON logging with tracing

use crate::models::Forecast;
use crate::predictor::ValidatedRequest;
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    prediction_errors_total: IntCounterVec,
    requests_total: IntCounterVec,
    model_info: GaugeVec,
}

impl ServiceMetricsInner {
    // Registration only fails on duplicate names, and the OnceLock guarantees
    // this runs once per process.
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "ecoflow_prediction_latency_seconds",
                "Time spent validating input and running the forecast model",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "ecoflow_predictions_total",
                "Total number of successful waste forecasts"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter_vec!(
                "ecoflow_prediction_errors_total",
                "Total number of failed waste forecasts by error kind",
                &["kind"]
            )
            .expect("Failed to register prediction_errors_total"),

            requests_total: register_int_counter_vec!(
                "ecoflow_requests_total",
                "Total number of handled requests by route",
                &["route"]
            )
            .expect("Failed to register requests_total"),

            model_info: register_gauge_vec!(
                "ecoflow_model_info",
                "Information about the currently loaded forecast model",
                &["version", "kind"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new)
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    /// Count a failed forecast under its error kind
    pub fn inc_prediction_errors(&self, kind: &str) {
        self.inner()
            .prediction_errors_total
            .with_label_values(&[kind])
            .inc();
    }

    /// Count a handled request for a route
    pub fn inc_requests(&self, route: &str) {
        self.inner().requests_total.with_label_values(&[route]).inc();
    }

    /// Update model info, replacing the previous labels
    pub fn set_model_info(&self, version: &str, kind: &str) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[version, kind])
            .set(1.0);
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for predictions,
/// rejected requests, and lifecycle events.
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Log a successful forecast
    pub fn log_prediction(&self, request: &ValidatedRequest, forecast: &Forecast) {
        info!(
            event = "prediction_generated",
            instance = %self.instance,
            location = %request.zone,
            day_of_week = %request.day_of_week,
            temperature = request.temperature,
            humidity = request.humidity,
            predicted_waste_kg = forecast.predicted_waste_kg,
            model_version = %forecast.model_version,
            "Generated waste forecast"
        );
    }

    /// Log a request turned away with a client error
    pub fn log_rejected(&self, route: &str, kind: &str, reason: &str) {
        info!(
            event = "request_rejected",
            instance = %self.instance,
            route = %route,
            kind = %kind,
            reason = %reason,
            "Request rejected"
        );
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, model_version: Option<&str>) {
        info!(
            event = "service_started",
            instance = %self.instance,
            service_version = %version,
            model_version = model_version.unwrap_or("none"),
            "Waste management service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Waste management service shutting down"
        );
    }

    /// Log a model artifact accepted at startup
    pub fn log_model_loaded(&self, path: &str, kind: &str, version: &str, checksum: &str) {
        info!(
            event = "model_loaded",
            instance = %self.instance,
            path = %path,
            kind = %kind,
            model_version = %version,
            checksum = %checksum,
            "Forecast model loaded"
        );
    }

    /// Log a model artifact that could not be loaded
    pub fn log_model_unavailable(&self, path: &str, error: &str) {
        warn!(
            event = "model_unavailable",
            instance = %self.instance,
            path = %path,
            error = %error,
            "Forecast model unavailable, forecasts will be refused"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_metrics_creation() {
        // Metrics live in the global Prometheus registry; creating several
        // handles must not register twice.
        let metrics = ServiceMetrics::new();
        let again = ServiceMetrics::new();

        metrics.observe_prediction_latency(0.0001);
        metrics.inc_predictions();
        again.inc_prediction_errors("no_data");
        again.inc_requests("/predict_waste");
        metrics.set_model_info("v1.0.0", "linear");
    }

    #[test]
    fn test_metrics_are_gathered() {
        let metrics = ServiceMetrics::new();
        metrics.inc_requests("/bins");

        let names: Vec<String> = prometheus::gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.iter().any(|name| name == "ecoflow_requests_total"));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-instance");
        assert_eq!(logger.instance, "test-instance");
    }
}
