//! Prediction adapter shared by the HTTP and terminal shells
//!
//! Validates a [`PredictionRequest`], encodes it into a [`FeatureRow`],
//! runs the forecaster once and wraps the scalar in a [`Forecast`].

use super::features::{FeatureRow, PredictionRequest, ValidatedRequest};
use super::{Forecaster, InferenceStats};
use crate::error::ForecastError;
use crate::models::Forecast;
use crate::observability::{ServiceMetrics, StructuredLogger};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Forecast entry point; cheap to share behind an `Arc`
pub struct ForecastService {
    forecaster: Option<Arc<dyn Forecaster>>,
    metrics: ServiceMetrics,
    logger: StructuredLogger,
    /// Inference failures since the last successful forecast
    consecutive_failures: AtomicU32,
}

impl ForecastService {
    pub fn new(
        forecaster: Arc<dyn Forecaster>,
        metrics: ServiceMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            forecaster: Some(forecaster),
            metrics,
            logger,
            consecutive_failures: AtomicU32::new(0),
        }
    }

    /// Service that validates requests but answers every forecast with
    /// [`ForecastError::ModelUnavailable`]
    pub fn without_model(metrics: ServiceMetrics, logger: StructuredLogger) -> Self {
        Self {
            forecaster: None,
            metrics,
            logger,
            consecutive_failures: AtomicU32::new(0),
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.forecaster.is_some()
    }

    pub fn model_version(&self) -> Option<&str> {
        self.forecaster.as_deref().map(|f| f.model_version())
    }

    /// Inference counters of the loaded model
    pub fn inference_stats(&self) -> Option<InferenceStats> {
        self.forecaster.as_deref().map(|f| f.stats())
    }

    /// Inference failures in a row; reset by the next good forecast
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }

    /// Validate, encode and run one forecast
    pub fn predict(&self, request: &PredictionRequest) -> Result<Forecast, ForecastError> {
        let start = Instant::now();

        match self.run(request) {
            Ok((validated, forecast)) => {
                self.metrics
                    .observe_prediction_latency(start.elapsed().as_secs_f64());
                self.metrics.inc_predictions();
                self.consecutive_failures.store(0, Ordering::Relaxed);
                self.logger.log_prediction(&validated, &forecast);
                Ok(forecast)
            }
            Err(err) => {
                self.metrics.inc_prediction_errors(err.kind());
                match &err {
                    ForecastError::Inference(cause) => {
                        self.consecutive_failures.fetch_add(1, Ordering::Relaxed);
                        error!(error = %format!("{:#}", cause), "Forecast model failed");
                    }
                    other => debug!(reason = %other, "Forecast request rejected"),
                }
                Err(err)
            }
        }
    }

    fn run(&self, request: &PredictionRequest) -> Result<(ValidatedRequest, Forecast), ForecastError> {
        let validated = request.validate()?;
        let forecaster = self
            .forecaster
            .as_deref()
            .ok_or(ForecastError::ModelUnavailable)?;

        let features = FeatureRow::from(&validated);
        let value = forecaster
            .forecast(&features)
            .map_err(ForecastError::Inference)?;

        if !value.is_finite() {
            return Err(ForecastError::Inference(anyhow::anyhow!(
                "Model returned non-finite value {}",
                value
            )));
        }

        Ok((
            validated,
            Forecast {
                predicted_waste_kg: value,
                model_version: forecaster.model_version().to_string(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::predictor::LinearForecaster;
    use std::sync::Mutex;

    /// Records every feature row it sees and returns a fixed value
    struct RecordingForecaster {
        seen: Mutex<Vec<FeatureRow>>,
        output: f64,
    }

    impl Forecaster for RecordingForecaster {
        fn forecast(&self, features: &FeatureRow) -> anyhow::Result<f64> {
            self.seen.lock().unwrap().push(*features);
            Ok(self.output)
        }

        fn model_version(&self) -> &str {
            "recording"
        }

        fn stats(&self) -> InferenceStats {
            InferenceStats::default()
        }
    }

    struct FailingForecaster;

    impl Forecaster for FailingForecaster {
        fn forecast(&self, _features: &FeatureRow) -> anyhow::Result<f64> {
            anyhow::bail!("internal tensor error at /var/lib/model")
        }

        fn model_version(&self) -> &str {
            "failing"
        }

        fn stats(&self) -> InferenceStats {
            InferenceStats::default()
        }
    }

    fn service_with(forecaster: Arc<dyn Forecaster>) -> ForecastService {
        ForecastService::new(forecaster, ServiceMetrics::new(), StructuredLogger::new("test"))
    }

    #[test]
    fn test_model_receives_features_in_training_order() {
        let recorder = Arc::new(RecordingForecaster {
            seen: Mutex::new(Vec::new()),
            output: 42.0,
        });
        let service = service_with(recorder.clone());

        let forecast = service
            .predict(&PredictionRequest::new("Zone B", 30.0, 55.0, "Saturday"))
            .unwrap();

        assert_eq!(forecast.predicted_waste_kg, 42.0);
        assert_eq!(forecast.model_version, "recording");
        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].values(), &[30.0, 55.0, 5.0, 1.0]);
    }

    #[test]
    fn test_invalid_input_never_reaches_model() {
        let recorder = Arc::new(RecordingForecaster {
            seen: Mutex::new(Vec::new()),
            output: 1.0,
        });
        let service = service_with(recorder.clone());

        let err = service
            .predict(&PredictionRequest::new("Zone X", 30.0, 55.0, "Saturday"))
            .unwrap_err();
        assert!(matches!(
            err,
            ForecastError::Validation(ValidationError::InvalidLocationOrDay)
        ));
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_repeated_requests_are_bit_identical() {
        let service = service_with(Arc::new(LinearForecaster::new(
            [0.731, -0.119, 2.17, 3.3],
            41.07,
            "v-test",
        )));
        let request = PredictionRequest::new("Zone D", 27.9, 63.4, "Thursday");

        let first = service.predict(&request).unwrap();
        for _ in 0..20 {
            let next = service.predict(&request).unwrap();
            assert_eq!(
                next.predicted_waste_kg.to_bits(),
                first.predicted_waste_kg.to_bits()
            );
        }
        assert_eq!(service.inference_stats().unwrap().total_inferences, 21);
    }

    #[test]
    fn test_inference_failure_is_generic() {
        let service = service_with(Arc::new(FailingForecaster));
        let err = service
            .predict(&PredictionRequest::new("Zone A", 20.0, 50.0, "Monday"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Prediction failed.");
    }

    /// Fails while the switch is on
    struct SwitchableForecaster {
        failing: std::sync::atomic::AtomicBool,
    }

    impl Forecaster for SwitchableForecaster {
        fn forecast(&self, _features: &FeatureRow) -> anyhow::Result<f64> {
            if self.failing.load(Ordering::Relaxed) {
                anyhow::bail!("runtime unavailable");
            }
            Ok(120.0)
        }

        fn model_version(&self) -> &str {
            "switchable"
        }

        fn stats(&self) -> InferenceStats {
            InferenceStats::default()
        }
    }

    #[test]
    fn test_consecutive_failures_reset_on_success() {
        let model = Arc::new(SwitchableForecaster {
            failing: std::sync::atomic::AtomicBool::new(true),
        });
        let service = service_with(model.clone());
        let request = PredictionRequest::new("Zone A", 20.0, 50.0, "Monday");

        assert!(service.predict(&request).is_err());
        assert!(service.predict(&request).is_err());
        // Rejected input does not touch the counter
        assert!(service.predict(&PredictionRequest::default()).is_err());
        assert_eq!(service.consecutive_failures(), 2);

        model.failing.store(false, Ordering::Relaxed);
        assert!(service.predict(&request).is_ok());
        assert_eq!(service.consecutive_failures(), 0);
    }

    #[test]
    fn test_non_finite_output_rejected() {
        let service = service_with(Arc::new(RecordingForecaster {
            seen: Mutex::new(Vec::new()),
            output: f64::NAN,
        }));
        let err = service
            .predict(&PredictionRequest::new("Zone A", 20.0, 50.0, "Monday"))
            .unwrap_err();
        assert!(matches!(err, ForecastError::Inference(_)));
    }

    #[test]
    fn test_without_model() {
        let service =
            ForecastService::without_model(ServiceMetrics::new(), StructuredLogger::new("test"));
        assert!(!service.is_model_loaded());
        assert!(service.model_version().is_none());

        let err = service
            .predict(&PredictionRequest::new("Zone A", 20.0, 50.0, "Monday"))
            .unwrap_err();
        assert!(matches!(err, ForecastError::ModelUnavailable));

        // Validation still runs first
        let err = service.predict(&PredictionRequest::default()).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::Validation(ValidationError::MissingLocationOrDay)
        ));
    }
}
