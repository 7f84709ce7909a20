//! Wing and pilot metadata supplied alongside a track.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest projected area accepted as a wing size, in m².
const MIN_WING_AREA: f64 = 5.0;

/// Largest projected area accepted as a wing size, in m².
const MAX_WING_AREA: f64 = 60.0;

/// What the engine may know about the wing and its pilot.
///
/// Every field is optional. Sizes and weights only count as known when they
/// are finite and positive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WingProfile {
    /// Wing category, e.g. `"Thermal"`.
    pub wing_type: Option<String>,
    /// Projected area in m².
    pub wing_size: Option<f64>,
    /// Pilot weight in kg.
    pub pilot_weight: Option<f64>,
}

impl WingProfile {
    /// Create an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wing category.
    #[must_use]
    pub fn with_wing_type(mut self, wing_type: impl Into<String>) -> Self {
        self.wing_type = Some(wing_type.into());
        self
    }

    /// Set the projected area (m²).
    #[must_use]
    pub fn with_wing_size(mut self, wing_size: f64) -> Self {
        self.wing_size = Some(wing_size);
        self
    }

    /// Set the pilot weight (kg).
    #[must_use]
    pub fn with_pilot_weight(mut self, pilot_weight: f64) -> Self {
        self.pilot_weight = Some(pilot_weight);
        self
    }

    /// The wing size, if known.
    #[must_use]
    pub fn known_wing_size(&self) -> Option<f64> {
        self.wing_size.filter(|v| is_known(*v))
    }

    /// The pilot weight, if known.
    #[must_use]
    pub fn known_pilot_weight(&self) -> Option<f64> {
        self.pilot_weight.filter(|v| is_known(*v))
    }

    /// Check whether a usable wing size was supplied.
    #[must_use]
    pub fn has_wing_size(&self) -> bool {
        self.known_wing_size().is_some()
    }

    /// Check whether a usable pilot weight was supplied.
    #[must_use]
    pub fn has_pilot_weight(&self) -> bool {
        self.known_pilot_weight().is_some()
    }

    /// Wing loading in kg/m², when both weight and size are known.
    #[must_use]
    pub fn wing_loading(&self) -> Option<f64> {
        Some(self.known_pilot_weight()? / self.known_wing_size()?)
    }

    /// Overlay `overrides` on top of this profile; set fields win.
    #[must_use]
    pub fn merged_with(self, overrides: WingProfile) -> Self {
        Self {
            wing_type: overrides.wing_type.or(self.wing_type),
            wing_size: overrides.wing_size.or(self.wing_size),
            pilot_weight: overrides.pilot_weight.or(self.pilot_weight),
        }
    }
}

fn is_known(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Extracts projected wing areas from catalogue-style size strings.
///
/// Handles `"22"`, `"22.5 m²"`, `"23,5m2"` and labels like
/// `"M (85-105 kg) 24 m²"`. An explicit area unit wins; otherwise the first
/// number in a plausible area range is used.
#[derive(Debug)]
pub struct WingSizeParser {
    with_unit: Regex,
    number: Regex,
}

impl WingSizeParser {
    /// Compile the parser.
    ///
    /// # Panics
    ///
    /// Panics if the built-in patterns are invalid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            with_unit: Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:m²|m2|m\^2|sqm)")
                .expect("Invalid wing area pattern"),
            number: Regex::new(r"\d+(?:[.,]\d+)?").expect("Invalid number pattern"),
        }
    }

    /// Parse `input` into m².
    #[must_use]
    pub fn parse(&self, input: &str) -> Option<f64> {
        if let Some(caps) = self.with_unit.captures(input) {
            return parse_decimal(&caps[1]).filter(|area| is_plausible_area(*area));
        }

        self.number
            .find_iter(input)
            .filter_map(|m| parse_decimal(m.as_str()))
            .find(|area| is_plausible_area(*area))
    }
}

impl Default for WingSizeParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_decimal(text: &str) -> Option<f64> {
    text.replace(',', ".").parse().ok()
}

fn is_plausible_area(area: f64) -> bool {
    (MIN_WING_AREA..=MAX_WING_AREA).contains(&area)
}

/// Parse a free-text wing size into m², or `None` if no area can be read.
#[must_use]
pub fn parse_wing_size(input: &str) -> Option<f64> {
    static PARSER: OnceLock<WingSizeParser> = OnceLock::new();
    PARSER.get_or_init(WingSizeParser::new).parse(input)
}

/// Like [`parse_wing_size`], but an unreadable size is an error.
///
/// # Errors
///
/// Returns [`Error::InvalidWingSize`] if no plausible area is found.
pub fn require_wing_size(input: &str) -> Result<f64> {
    parse_wing_size(input).ok_or_else(|| Error::invalid_wing_size(input))
}
