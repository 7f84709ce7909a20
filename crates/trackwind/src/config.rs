//! Configuration management for trackwind.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file
//! and `TRACKWIND_` environment variables.

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::engine::trim::{
    DEFAULT_TRIM_KMH, LOADING_SENSITIVITY, REFERENCE_WING_LOADING, TRIM_SPEEDS_KMH,
};
use crate::error::{Error, Result};
use crate::units::SpeedUnit;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "trackwind";

/// Number of heading octants.
const OCTANTS: usize = 8;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TRACKWIND_`, sections separated
///    by `__`, e.g. `TRACKWIND_ENGINE__MIN_SAMPLES=20`)
/// 2. TOML config file at `~/.config/trackwind/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Estimation thresholds.
    pub engine: EngineConfig,
    /// Trim-speed table.
    pub trim: TrimConfig,
    /// Presentation preferences.
    pub output: OutputConfig,
    /// Batch processing.
    pub batch: BatchConfig,
}

/// Thresholds used by the estimation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum number of track points, before and after filtering.
    pub min_samples: usize,
    /// Ground speeds at or above this (m/s) are treated as GPS noise.
    pub max_valid_speed: f64,
    /// Segments at or below this speed (m/s) have no usable heading.
    pub min_segment_speed: f64,
    /// Segments spanning this many seconds or more are sampling gaps.
    pub max_segment_gap_secs: f64,
    /// Minimum number of octants that must carry data.
    pub min_directions: usize,
    /// Samples an octant needs before it counts as covered.
    pub min_samples_per_direction: usize,
    /// Wind below this speed (m/s) is reported as below resolution.
    pub low_wind_floor: f64,
    /// Wing loading (kg/m²) at which the table trim speeds apply.
    pub reference_wing_loading: f64,
    /// Fractional trim change per kg/m² of loading deviation.
    pub loading_sensitivity: f64,
}

/// Trim speeds per wing category, in km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Trim speed for unknown or missing wing types.
    pub default_kmh: f64,
    /// Trim speed per wing category. Keys match case-insensitively.
    pub speeds_kmh: BTreeMap<String, f64>,
}

/// How results are presented.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Unit for wind speeds.
    pub units: SpeedUnit,
    /// Output format.
    pub format: OutputFormat,
}

/// Batch processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of tracks estimated at the same time.
    pub max_concurrent: usize,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Plain,
    /// JSON.
    Json,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_samples: 12,
            max_valid_speed: 50.0,
            min_segment_speed: 0.5,
            max_segment_gap_secs: 30.0,
            min_directions: 3,
            min_samples_per_direction: 2,
            low_wind_floor: 1.0,
            reference_wing_loading: REFERENCE_WING_LOADING,
            loading_sensitivity: LOADING_SENSITIVITY,
        }
    }
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            default_kmh: DEFAULT_TRIM_KMH,
            speeds_kmh: TRIM_SPEEDS_KMH
                .iter()
                .map(|(name, kmh)| ((*name).to_string(), *kmh))
                .collect(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrent: 8 }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("TRACKWIND_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let engine = &self.engine;

        if engine.min_samples < 2 {
            return Err(Error::config_validation(format!(
                "min_samples ({}) must be at least 2",
                engine.min_samples
            )));
        }

        if !(1..=OCTANTS).contains(&engine.min_directions) {
            return Err(Error::config_validation(format!(
                "min_directions ({}) must be between 1 and {OCTANTS}",
                engine.min_directions
            )));
        }

        if engine.min_samples_per_direction == 0 {
            return Err(Error::config_validation(
                "min_samples_per_direction must be greater than 0",
            ));
        }

        for (name, value) in [
            ("max_valid_speed", engine.max_valid_speed),
            ("max_segment_gap_secs", engine.max_segment_gap_secs),
            ("reference_wing_loading", engine.reference_wing_loading),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::config_validation(format!(
                    "{name} ({value}) must be greater than 0"
                )));
            }
        }

        for (name, value) in [
            ("min_segment_speed", engine.min_segment_speed),
            ("low_wind_floor", engine.low_wind_floor),
            ("loading_sensitivity", engine.loading_sensitivity),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::config_validation(format!(
                    "{name} ({value}) must not be negative"
                )));
            }
        }

        if engine.min_segment_speed >= engine.max_valid_speed {
            return Err(Error::config_validation(format!(
                "min_segment_speed ({}) must be below max_valid_speed ({})",
                engine.min_segment_speed, engine.max_valid_speed
            )));
        }

        let trims = std::iter::once(("default", self.trim.default_kmh)).chain(
            self.trim
                .speeds_kmh
                .iter()
                .map(|(name, kmh)| (name.as_str(), *kmh)),
        );
        for (name, kmh) in trims {
            if !(kmh.is_finite() && kmh > 0.0) {
                return Err(Error::config_validation(format!(
                    "trim speed for '{name}' ({kmh}) must be greater than 0"
                )));
            }
        }

        if self.batch.max_concurrent == 0 {
            return Err(Error::config_validation(
                "max_concurrent must be greater than 0",
            ));
        }

        Ok(())
    }
}
