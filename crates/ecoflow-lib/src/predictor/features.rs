//! Request validation and feature encoding for the forecast model
//!
//! Turns loosely-typed request fields into the fixed four-value feature row
//! the model was fitted on: temperature, humidity, day-of-week code and
//! location code, in that order.

use crate::encoding::{DayOfWeek, Zone};
use crate::error::ValidationError;
use serde_json::Value;

/// Number of input features expected by every forecaster
pub const NUM_FEATURES: usize = 4;

/// Value used when a numeric field is absent from the request
pub const DEFAULT_NUMERIC_VALUE: f64 = 0.0;

/// Raw forecast request as received from a shell
///
/// Fields stay optional here; [`PredictionRequest::validate`] decides what is
/// required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionRequest {
    pub location: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub day_of_week: Option<String>,
}

/// Request whose categories are known and whose numbers are finite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest {
    pub zone: Zone,
    pub day_of_week: DayOfWeek,
    pub temperature: f64,
    pub humidity: f64,
}

/// Model input row in training column order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow(pub [f64; NUM_FEATURES]);

impl PredictionRequest {
    pub fn new(
        location: impl Into<String>,
        temperature: f64,
        humidity: f64,
        day_of_week: impl Into<String>,
    ) -> Self {
        Self {
            location: Some(location.into()),
            temperature: Some(temperature),
            humidity: Some(humidity),
            day_of_week: Some(day_of_week.into()),
        }
    }

    /// Build a request from a decoded JSON body
    ///
    /// `null`, non-objects and empty objects count as "no data". Absent
    /// numeric fields become `None` and later default to zero; present ones
    /// must be a JSON number or a string holding a finite number.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let object = match body.as_object() {
            Some(object) if !object.is_empty() => object,
            _ => return Err(ValidationError::NoData),
        };

        let temperature = numeric_field(object.get("temperature"), "temperature")?;
        let humidity = numeric_field(object.get("humidity"), "humidity")?;

        Ok(Self {
            location: category_text(object.get("location")),
            temperature,
            humidity,
            day_of_week: category_text(object.get("day_of_week")),
        })
    }

    /// Check required fields and map categories to their enums
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        let temperature = finite(self.temperature, "temperature")?;
        let humidity = finite(self.humidity, "humidity")?;

        let (location, day) = match (non_empty(&self.location), non_empty(&self.day_of_week)) {
            (Some(location), Some(day)) => (location, day),
            _ => return Err(ValidationError::MissingLocationOrDay),
        };

        let zone = location
            .parse::<Zone>()
            .map_err(|_| ValidationError::InvalidLocationOrDay)?;
        let day_of_week = day
            .parse::<DayOfWeek>()
            .map_err(|_| ValidationError::InvalidLocationOrDay)?;

        Ok(ValidatedRequest {
            zone,
            day_of_week,
            temperature,
            humidity,
        })
    }
}

impl From<&ValidatedRequest> for FeatureRow {
    fn from(request: &ValidatedRequest) -> Self {
        FeatureRow([
            request.temperature,
            request.humidity,
            f64::from(request.day_of_week.code()),
            f64::from(request.zone.code()),
        ])
    }
}

impl FeatureRow {
    pub fn values(&self) -> &[f64; NUM_FEATURES] {
        &self.0
    }

    /// Single-precision copy for ONNX models
    pub fn to_f32(&self) -> Vec<f32> {
        self.0.iter().map(|v| *v as f32).collect()
    }
}

/// Parse a numeric string the way a form field would be read
pub fn parse_number(raw: &str, field: &'static str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ValidationError::NotANumber { field })
}

fn numeric_field(value: Option<&Value>, field: &'static str) -> Result<Option<f64>, ValidationError> {
    match value {
        None => Ok(None),
        Some(Value::Number(number)) => number
            .as_f64()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or(ValidationError::NotANumber { field }),
        Some(Value::String(raw)) => parse_number(raw, field).map(Some),
        Some(_) => Err(ValidationError::NotANumber { field }),
    }
}

/// Read a category field from a JSON body
///
/// Empty values (`null`, `false`, `0`, `""`, `[]`, `{}`) count as missing.
/// Other non-string values are kept as JSON text so they fail the table
/// lookup.
pub fn category_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn finite(value: Option<f64>, field: &'static str) -> Result<f64, ValidationError> {
    let value = value.unwrap_or(DEFAULT_NUMERIC_VALUE);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotANumber { field })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}
