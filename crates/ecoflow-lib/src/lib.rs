//! Core library for the EcoFlow waste management service
//!
//! This crate provides the core functionality for:
//! - Categorical encoding of zones and weekdays
//! - Static bin and zone reference tables (route lookup, insights)
//! - Waste generation forecasting behind a pre-trained model
//! - Health checks and observability

pub mod encoding;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod reference;

pub use encoding::{DayOfWeek, Zone};
pub use error::{ForecastError, ValidationError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::{ForecastService, Forecaster, PredictionRequest};
