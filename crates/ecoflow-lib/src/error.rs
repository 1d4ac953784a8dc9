//! Error types shared by the HTTP and terminal shells
//!
//! Every failure collapses into one of two kinds: a [`ValidationError`]
//! caused by the caller's input, or an internal failure while running the
//! forecast model.

/// Input rejected before any model or table lookup happens.
///
/// The display strings are user-facing and stable; both shells show them
/// verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Request carried no payload at all (or an empty object).
    #[error("No data provided")]
    NoData,
    /// Request body was not valid JSON.
    #[error("Malformed JSON body.")]
    MalformedBody,
    /// A numeric field was present but could not be read as a finite number.
    #[error("{field} must be a number.")]
    NotANumber { field: &'static str },
    /// Forecast request without location or day of week.
    #[error("Location and day of week are required.")]
    MissingLocationOrDay,
    /// Location or day of week outside the known categories.
    #[error("Invalid location or day of week.")]
    InvalidLocationOrDay,
    /// Route request without a location.
    #[error("Location is required.")]
    MissingLocation,
    /// Route request for a zone not in the reference table.
    #[error("Invalid location.")]
    UnknownZone,
    /// Bin lookup without a bin identifier.
    #[error("No bin selected.")]
    MissingBin,
    /// Bin lookup for an identifier not in the reference table.
    #[error("Invalid bin selected.")]
    UnknownBin,
}

impl ValidationError {
    /// Short machine-readable label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::NoData => "no_data",
            ValidationError::MalformedBody => "malformed_body",
            ValidationError::NotANumber { .. } => "not_a_number",
            ValidationError::MissingLocationOrDay => "missing_location_or_day",
            ValidationError::InvalidLocationOrDay => "invalid_location_or_day",
            ValidationError::MissingLocation => "missing_location",
            ValidationError::UnknownZone => "unknown_zone",
            ValidationError::MissingBin => "missing_bin",
            ValidationError::UnknownBin => "unknown_bin",
        }
    }
}

/// Failure while producing a waste forecast.
#[derive(thiserror::Error, Debug)]
pub enum ForecastError {
    /// The request was rejected before reaching the model.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The service started without a usable model artifact.
    #[error("Forecast model is not loaded.")]
    ModelUnavailable,
    /// The model failed or produced an unusable value.
    ///
    /// The inner error is for logs only; callers get the generic message.
    #[error("Prediction failed.")]
    Inference(#[source] anyhow::Error),
}

impl ForecastError {
    /// Metric label for the error kind; validation failures carry their own
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::Validation(err) => err.kind(),
            ForecastError::ModelUnavailable => "model_unavailable",
            ForecastError::Inference(_) => "inference",
        }
    }
}
