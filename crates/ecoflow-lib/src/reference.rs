//! Static reference tables for bins and zones
//!
//! Both tables live for the whole process and are never mutated, so they are
//! plain `static` arrays rather than anything behind a lock.

use crate::encoding::Zone;
use crate::error::ValidationError;
use crate::models::{Bin, BinStatus, RouteSuggestion, WasteInsights, ZoneRecord};

static BINS: [Bin; 6] = [
    Bin { id: "Bin 1", filled_kg: 30, capacity_kg: 100 },
    Bin { id: "Bin 2", filled_kg: 70, capacity_kg: 100 },
    Bin { id: "Bin 3", filled_kg: 45, capacity_kg: 100 },
    Bin { id: "Bin 4", filled_kg: 90, capacity_kg: 100 },
    Bin { id: "Bin 5", filled_kg: 10, capacity_kg: 100 },
    Bin { id: "Bin 6", filled_kg: 50, capacity_kg: 100 },
];

static ZONES: [ZoneRecord; 4] = [
    ZoneRecord { zone: Zone::A, average_distance_km: 5, waste_generated_kg: 100.0 },
    ZoneRecord { zone: Zone::B, average_distance_km: 10, waste_generated_kg: 200.0 },
    ZoneRecord { zone: Zone::C, average_distance_km: 15, waste_generated_kg: 150.0 },
    ZoneRecord { zone: Zone::D, average_distance_km: 20, waste_generated_kg: 180.0 },
];

/// All bins in table order
pub fn bins() -> &'static [Bin] {
    &BINS
}

/// All zone reference rows
pub fn zones() -> &'static [ZoneRecord] {
    &ZONES
}

impl Bin {
    pub fn status(&self) -> BinStatus {
        BinStatus {
            bin: self.id.to_string(),
            filled_kg: self.filled_kg,
            empty_kg: i64::from(self.capacity_kg) - i64::from(self.filled_kg),
            capacity_kg: self.capacity_kg,
        }
    }
}

/// Look up the fill status of a bin by identifier
pub fn bin_status(id: &str) -> Result<BinStatus, ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::MissingBin);
    }

    BINS.iter()
        .find(|bin| bin.id == id)
        .map(Bin::status)
        .ok_or(ValidationError::UnknownBin)
}

/// Return the precomputed route distance for a zone
///
/// This is a table lookup, not a routing algorithm.
pub fn optimize_route(location: &str) -> Result<RouteSuggestion, ValidationError> {
    if location.is_empty() {
        return Err(ValidationError::MissingLocation);
    }

    ZONES
        .iter()
        .find(|record| record.zone.name() == location)
        .map(|record| RouteSuggestion {
            zone: record.zone,
            distance_km: record.average_distance_km,
        })
        .ok_or(ValidationError::UnknownZone)
}

/// Mean, max and min of the historical waste column
pub fn insights() -> WasteInsights {
    summarize(ZONES.iter().map(|record| record.waste_generated_kg))
        .unwrap_or(WasteInsights { mean_kg: 0.0, max_kg: 0.0, min_kg: 0.0 })
}

fn summarize(values: impl Iterator<Item = f64>) -> Option<WasteInsights> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;

    for value in values {
        count += 1;
        sum += value;
        max = max.max(value);
        min = min.min(value);
    }

    if count == 0 {
        return None;
    }

    Some(WasteInsights {
        mean_kg: sum / count as f64,
        max_kg: max,
        min_kg: min,
    })
}
