//! Waste generation forecasting

mod features;
mod inference;
mod loader;
mod output;
mod service;

pub use features::{
    category_text, parse_number, FeatureRow, PredictionRequest, ValidatedRequest, DEFAULT_NUMERIC_VALUE,
    NUM_FEATURES,
};
pub use inference::{InferenceStats, LinearForecaster, OnnxForecaster, TreeForecaster, TreeNode};
pub use loader::{compute_checksum, load_forecaster, LoadedModel, ModelKind, DEFAULT_MODEL_VERSION};
pub use output::{format_kg, format_whole_kg, MASS_UNIT};
pub use service::ForecastService;

use anyhow::Result;

/// Trait for pre-fitted regression models
///
/// Implementations are immutable once loaded, so repeated calls with the
/// same row return the same value.
pub trait Forecaster: Send + Sync {
    /// Predict waste in kilograms for one feature row
    fn forecast(&self, features: &FeatureRow) -> Result<f64>;

    /// Version string of the loaded artifact
    fn model_version(&self) -> &str;

    /// Inference counters since load
    fn stats(&self) -> InferenceStats;
}
