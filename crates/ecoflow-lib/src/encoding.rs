//! Categorical encoding tables
//!
//! The forecast model was fitted on integer codes for location and day of
//! week. These enums are the single source of those codes; every shell goes
//! through them so the mapping cannot drift between entry points.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Collection zone known to the model and the reference tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "Zone A")]
    A,
    #[serde(rename = "Zone B")]
    B,
    #[serde(rename = "Zone C")]
    C,
    #[serde(rename = "Zone D")]
    D,
}

impl Zone {
    /// All zones in code order
    pub const ALL: [Zone; 4] = [Zone::A, Zone::B, Zone::C, Zone::D];

    /// Integer code fed to the model (alphabetic order, 0..=3)
    pub fn code(self) -> u8 {
        match self {
            Zone::A => 0,
            Zone::B => 1,
            Zone::C => 2,
            Zone::D => 3,
        }
    }

    /// Display name, also the only accepted input spelling
    pub fn name(self) -> &'static str {
        match self {
            Zone::A => "Zone A",
            Zone::B => "Zone B",
            Zone::C => "Zone C",
            Zone::D => "Zone D",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name is not part of an encoding table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {:?}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Zone {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::ALL
            .into_iter()
            .find(|zone| zone.name() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Day of week as the model saw it during training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All days in code order
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Integer code fed to the model (calendar order from Monday, 0..=6)
    pub fn code(self) -> u8 {
        match self {
            DayOfWeek::Monday => 0,
            DayOfWeek::Tuesday => 1,
            DayOfWeek::Wednesday => 2,
            DayOfWeek::Thursday => 3,
            DayOfWeek::Friday => 4,
            DayOfWeek::Saturday => 5,
            DayOfWeek::Sunday => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.name() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_codes_in_range_and_unique() {
        let codes: Vec<u8> = Zone::ALL.iter().map(|z| z.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_day_codes_follow_calendar_order() {
        let codes: Vec<u8> = DayOfWeek::ALL.iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(DayOfWeek::Monday.code(), 0);
        assert_eq!(DayOfWeek::Sunday.code(), 6);
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        for zone in Zone::ALL {
            assert_eq!(zone.name().parse::<Zone>(), Ok(zone));
        }
        for day in DayOfWeek::ALL {
            assert_eq!(day.name().parse::<DayOfWeek>(), Ok(day));
        }
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!("Zone E".parse::<Zone>().is_err());
        assert!("zone a".parse::<Zone>().is_err());
        assert!(" Zone A".parse::<Zone>().is_err());
        assert!("".parse::<Zone>().is_err());
        assert!("Mon".parse::<DayOfWeek>().is_err());
        assert!("monday".parse::<DayOfWeek>().is_err());
        assert!("Funday".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn test_zone_serializes_as_display_name() {
        let json = serde_json::to_string(&Zone::C).unwrap();
        assert_eq!(json, "\"Zone C\"");
    }
}
