//! Formatting of forecast and table values for display
//!
//! Both shells show amounts with a `kg` suffix; forecasts use two decimals,
//! bin figures are whole kilograms.

use crate::models::{BinStatus, Forecast};
use std::fmt;

/// Unit suffix for every amount shown to users
pub const MASS_UNIT: &str = "kg";

/// Format a forecast amount, e.g. `"123.46 kg"`
pub fn format_kg(value: f64) -> String {
    format!("{:.2} {}", value, MASS_UNIT)
}

/// Format a whole-kilogram figure, e.g. `"90 kg"`
pub fn format_whole_kg(value: impl fmt::Display) -> String {
    format!("{} {}", value, MASS_UNIT)
}

impl fmt::Display for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_kg(self.predicted_waste_kg))
    }
}

impl BinStatus {
    pub fn filled_label(&self) -> String {
        format_whole_kg(self.filled_kg)
    }

    pub fn empty_label(&self) -> String {
        format_whole_kg(self.empty_kg)
    }

    pub fn capacity_label(&self) -> String {
        format_whole_kg(self.capacity_kg)
    }
}
