//! Expected trim airspeed of a wing.
//!
//! Trim speed depends on the wing category and, when the pilot weight and
//! wing area are both known, on wing loading: a more heavily loaded wing flies
//! faster at trim.

use std::collections::BTreeMap;

use crate::config::{EngineConfig, TrimConfig};
use crate::units::kmh_to_mps;
use crate::wing::WingProfile;

/// Trim speed (km/h) used when the wing type is missing or unknown.
pub const DEFAULT_TRIM_KMH: f64 = 37.0;

/// Trim speeds (km/h) by wing category.
pub const TRIM_SPEEDS_KMH: [(&str, f64); 5] = [
    ("Soaring", 36.0),
    ("Cross", 40.0),
    ("Thermal", 38.0),
    ("Speedflying", 50.0),
    ("Acro", 42.0),
];

/// Wing loading (kg/m²) at which the table speeds apply.
pub const REFERENCE_WING_LOADING: f64 = 5.0;

/// Fractional trim change per kg/m² away from the reference loading.
pub const LOADING_SENSITIVITY: f64 = 0.03;

/// Resolves the expected airspeed for a wing profile.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimModel {
    /// Keys are lowercased.
    speeds_kmh: BTreeMap<String, f64>,
    default_kmh: f64,
    reference_loading: f64,
    sensitivity: f64,
}

impl Default for TrimModel {
    fn default() -> Self {
        Self::from_config(&TrimConfig::default(), &EngineConfig::default())
    }
}

impl TrimModel {
    /// Build a model from configuration.
    #[must_use]
    pub fn from_config(trim: &TrimConfig, engine: &EngineConfig) -> Self {
        Self {
            speeds_kmh: trim
                .speeds_kmh
                .iter()
                .map(|(name, kmh)| (normalize_key(name), *kmh))
                .collect(),
            default_kmh: trim.default_kmh,
            reference_loading: engine.reference_wing_loading,
            sensitivity: engine.loading_sensitivity,
        }
    }

    /// Table trim speed in km/h, falling back to the default.
    #[must_use]
    pub fn base_trim_kmh(&self, wing_type: Option<&str>) -> f64 {
        wing_type
            .and_then(|name| self.speeds_kmh.get(&normalize_key(name)))
            .copied()
            .unwrap_or(self.default_kmh)
    }

    /// Multiplier applied to the base trim for a given wing loading.
    #[must_use]
    pub fn loading_factor(&self, wing_loading: f64) -> f64 {
        1.0 + (wing_loading - self.reference_loading) * self.sensitivity
    }

    /// Expected trim airspeed in m/s.
    ///
    /// Without both a pilot weight and a wing size the table speed is used
    /// unadjusted.
    #[must_use]
    pub fn expected_airspeed(&self, wing: &WingProfile) -> f64 {
        let base = kmh_to_mps(self.base_trim_kmh(wing.wing_type.as_deref()));
        match wing.wing_loading() {
            Some(loading) => base * self.loading_factor(loading),
            None => base,
        }
    }
}

fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Expected trim airspeed (m/s) using the built-in table.
#[must_use]
pub fn expected_airspeed(
    wing_type: Option<&str>,
    wing_size: Option<f64>,
    pilot_weight: Option<f64>,
) -> f64 {
    TrimModel::default().expected_airspeed(&WingProfile {
        wing_type: wing_type.map(str::to_string),
        wing_size,
        pilot_weight,
    })
}
