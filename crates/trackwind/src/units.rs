//! Speed unit conversions.
//!
//! The engine works in m/s throughout; these helpers exist for display and
//! for trim tables that are quoted in km/h.

use serde::{Deserialize, Serialize};

/// Metres per second to knots.
pub const MPS_TO_KNOTS: f64 = 1.94384;

/// Metres per second to kilometres per hour.
pub const MPS_TO_KMH: f64 = 3.6;

/// Convert m/s to knots.
#[must_use]
pub fn mps_to_knots(mps: f64) -> f64 {
    mps * MPS_TO_KNOTS
}

/// Convert knots to m/s.
#[must_use]
pub fn knots_to_mps(knots: f64) -> f64 {
    knots / MPS_TO_KNOTS
}

/// Convert m/s to km/h.
#[must_use]
pub fn mps_to_kmh(mps: f64) -> f64 {
    mps * MPS_TO_KMH
}

/// Convert km/h to m/s.
#[must_use]
pub fn kmh_to_mps(kmh: f64) -> f64 {
    kmh / MPS_TO_KMH
}

/// Unit used when presenting a speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    /// Metres per second.
    #[serde(alias = "mps")]
    MetersPerSecond,
    /// Kilometres per hour.
    #[default]
    #[serde(alias = "kmh")]
    KilometersPerHour,
    /// Knots.
    Knots,
}

impl SpeedUnit {
    /// Convert a speed in m/s into this unit.
    #[must_use]
    pub fn from_mps(self, mps: f64) -> f64 {
        match self {
            Self::MetersPerSecond => mps,
            Self::KilometersPerHour => mps_to_kmh(mps),
            Self::Knots => mps_to_knots(mps),
        }
    }

    /// Convert a speed in this unit back into m/s.
    #[must_use]
    pub fn to_mps(self, value: f64) -> f64 {
        match self {
            Self::MetersPerSecond => value,
            Self::KilometersPerHour => kmh_to_mps(value),
            Self::Knots => knots_to_mps(value),
        }
    }

    /// Short display symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::MetersPerSecond => "m/s",
            Self::KilometersPerHour => "km/h",
            Self::Knots => "kt",
        }
    }
}

impl std::fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knots_round_trip() {
        for mps in [0.0, 1.0, 3.5, 7.25, 49.9] {
            let back = knots_to_mps(mps_to_knots(mps));
            assert!((back - mps).abs() < 1e-12, "{mps} -> {back}");
        }
    }

    #[test]
    fn test_kmh_conversion() {
        assert!((mps_to_kmh(10.0) - 36.0).abs() < 1e-12);
        assert!((kmh_to_mps(36.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_speed_unit_round_trip() {
        for unit in [
            SpeedUnit::MetersPerSecond,
            SpeedUnit::KilometersPerHour,
            SpeedUnit::Knots,
        ] {
            let value = unit.from_mps(4.2);
            assert!((unit.to_mps(value) - 4.2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_speed_unit_symbols() {
        assert_eq!(SpeedUnit::MetersPerSecond.to_string(), "m/s");
        assert_eq!(SpeedUnit::KilometersPerHour.to_string(), "km/h");
        assert_eq!(SpeedUnit::Knots.to_string(), "kt");
    }

    #[test]
    fn test_speed_unit_default() {
        assert_eq!(SpeedUnit::default(), SpeedUnit::KilometersPerHour);
    }

    #[test]
    fn test_speed_unit_deserialize_aliases() {
        let unit: SpeedUnit = serde_json::from_str("\"kmh\"").unwrap();
        assert_eq!(unit, SpeedUnit::KilometersPerHour);
        let unit: SpeedUnit = serde_json::from_str("\"mps\"").unwrap();
        assert_eq!(unit, SpeedUnit::MetersPerSecond);
        let unit: SpeedUnit = serde_json::from_str("\"knots\"").unwrap();
        assert_eq!(unit, SpeedUnit::Knots);
    }
}
