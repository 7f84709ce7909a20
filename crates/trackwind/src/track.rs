//! Recorded GPS tracks.
//!
//! A track file is JSON, either a bare array of points or a flight object
//! carrying the points together with optional wing metadata:
//!
//! ```json
//! {
//!   "wing_type": "Cross",
//!   "wing_size": "23.5 m²",
//!   "pilot_weight": 82,
//!   "points": [
//!     { "latitude": 46.01, "longitude": 7.74, "timestamp": "2024-07-01T10:00:00Z", "speed": 9.8 }
//!   ]
//! }
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::wing::{parse_wing_size, WingProfile};

/// A single GPS sample as produced by the flight recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsTrackPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// When the sample was taken.
    pub timestamp: DateTime<Utc>,
    /// Reported ground speed in m/s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Altitude in metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl GpsTrackPoint {
    /// Create a point without speed or altitude.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
            speed: None,
            altitude: None,
        }
    }

    /// Set the reported ground speed (m/s).
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Set the altitude (m).
    #[must_use]
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }
}

/// Wing size as it appears in a flight file: a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WingSizeField {
    /// Projected area in m².
    Area(f64),
    /// Free text such as `"M (23.5)"`.
    Text(String),
}

impl WingSizeField {
    /// Resolve to a projected area in m², if one can be read.
    #[must_use]
    pub fn square_meters(&self) -> Option<f64> {
        match self {
            Self::Area(area) => Some(*area),
            Self::Text(text) => parse_wing_size(text),
        }
    }
}

/// One recorded flight: its track plus whatever wing metadata came with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightTrack {
    /// Chronologically ordered samples.
    pub points: Vec<GpsTrackPoint>,
    /// Wing category, e.g. `"Cross"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wing_type: Option<String>,
    /// Wing size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wing_size: Option<WingSizeField>,
    /// Pilot weight in kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pilot_weight: Option<f64>,
}

impl FlightTrack {
    /// Wrap bare points without metadata.
    #[must_use]
    pub fn from_points(points: Vec<GpsTrackPoint>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Parse a track from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text is neither a point array nor a
    /// flight object.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        if json.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<GpsTrackPoint>>(json).map(Self::from_points)
        } else {
            serde_json::from_str(json)
        }
    }

    /// Load a track file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::TrackRead {
            path: path.to_path_buf(),
            source,
        })?;
        let track = Self::from_json_str(&contents).map_err(|source| Error::TrackParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            points = track.points.len(),
            "Loaded track"
        );
        Ok(track)
    }

    /// Wing metadata embedded in the file.
    ///
    /// A wing size that cannot be read is dropped with a warning; the
    /// estimate then proceeds without the wing-loading correction.
    #[must_use]
    pub fn wing_profile(&self) -> WingProfile {
        let wing_size = self.wing_size.as_ref().and_then(|field| {
            let area = field.square_meters();
            if area.is_none() {
                warn!(wing_size = ?field, "Ignoring unreadable wing size");
            }
            area
        });

        WingProfile {
            wing_type: self.wing_type.clone(),
            wing_size,
            pilot_weight: self.pilot_weight,
        }
    }

    /// Number of samples in the track.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether the track has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
