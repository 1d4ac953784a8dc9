//! Core data models for the waste management service

use crate::encoding::Zone;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A waste bin with its static fill level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bin {
    pub id: &'static str,
    pub filled_kg: u32,
    pub capacity_kg: u32,
}

/// Fill report for a single bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinStatus {
    pub bin: String,
    pub filled_kg: u32,
    /// `capacity - filled`; signed because the table does not enforce
    /// `filled <= capacity`
    pub empty_kg: i64,
    pub capacity_kg: u32,
}

/// Static per-zone reference row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneRecord {
    pub zone: Zone,
    pub average_distance_km: u32,
    pub waste_generated_kg: f64,
}

/// Canned route answer for a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSuggestion {
    pub zone: Zone,
    pub distance_km: u32,
}

impl fmt::Display for RouteSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with distance {} km", self.zone, self.distance_km)
    }
}

/// Descriptive statistics over the historical waste column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WasteInsights {
    pub mean_kg: f64,
    pub max_kg: f64,
    pub min_kg: f64,
}

/// Model output for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub predicted_waste_kg: f64,
    pub model_version: String,
}
