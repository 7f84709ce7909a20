//! Wind estimation from a single flight's GPS track.
//!
//! A wing flying circles or figure-eights in steady wind shows a ground speed
//! that rises downwind and falls upwind. The pipeline exploits that:
//!
//! 1. [`filter`]: drop samples without a plausible ground speed, then turn
//!    adjacent samples into heading/speed segments.
//! 2. [`aggregate`]: bucket segments into eight heading octants and take the
//!    median ground speed of each.
//! 3. [`trim`]: work out the airspeed the wing should fly at trim.
//! 4. [`solver`]: wind speed and direction from the fastest and slowest
//!    octants, with an uncertainty band.
//! 5. [`confidence`]: score how far the result can be trusted.
//!
//! Estimation is pure and deterministic. A track that cannot support an
//! estimate yields `None`, never an error.
//!
//! # Example
//!
//! ```
//! use trackwind::engine::WindEstimator;
//! use trackwind::{GpsTrackPoint, WingProfile};
//!
//! let track: Vec<GpsTrackPoint> = Vec::new();
//! let estimator = WindEstimator::new();
//!
//! // Too short to say anything about the wind.
//! assert!(estimator.estimate(&track, &WingProfile::new()).is_none());
//! ```

pub mod aggregate;
pub mod confidence;
pub mod filter;
pub mod solver;
pub mod trim;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, EngineConfig};
use crate::track::GpsTrackPoint;
use crate::wing::WingProfile;

use self::confidence::ConfidenceInputs;
use self::solver::Solution;
use self::trim::TrimModel;

/// Upper bound (m/s) reported when the wind is below resolution.
pub const BELOW_RESOLUTION_SPEED_MAX: f64 = 2.0;

/// Confidence reported when the wind is below resolution.
pub const BELOW_RESOLUTION_CONFIDENCE: f64 = 0.3;

/// How an estimate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    /// Measured from ground-speed variation with heading.
    GroundSpeedVariation,
    /// Some wind may be present but it is below what GPS speeds resolve.
    BelowResolution,
}

impl std::fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GroundSpeedVariation => write!(f, "ground_speed_variation"),
            Self::BelowResolution => write!(f, "below_resolution"),
        }
    }
}

/// Estimated wind for one flight.
///
/// Speeds are m/s, `direction` is the bearing the wind blows from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindEstimation {
    /// Best estimate of the wind speed.
    pub speed: f64,
    /// Lower bound of the plausible speed band.
    pub speed_min: f64,
    /// Upper bound of the plausible speed band.
    pub speed_max: f64,
    /// Bearing the wind blows from, `[0, 360)`.
    pub direction: f64,
    /// Trust in the estimate, `[0, 1]`.
    pub confidence: f64,
    /// How the estimate was obtained.
    pub method: EstimationMethod,
}

impl WindEstimation {
    /// The fixed result for wind that is present but too light to measure.
    #[must_use]
    pub const fn below_resolution() -> Self {
        Self {
            speed: 0.0,
            speed_min: 0.0,
            speed_max: BELOW_RESOLUTION_SPEED_MAX,
            direction: 0.0,
            confidence: BELOW_RESOLUTION_CONFIDENCE,
            method: EstimationMethod::BelowResolution,
        }
    }

    /// Check whether this is the below-resolution result.
    #[must_use]
    pub fn is_below_resolution(&self) -> bool {
        self.method == EstimationMethod::BelowResolution
    }
}

/// Why a track produced no estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The track has too few points.
    #[error("insufficient samples: {found} points, need {required}")]
    InsufficientSamples {
        /// Points in the track.
        found: usize,
        /// Points required.
        required: usize,
    },

    /// Too few points carry a usable ground speed.
    #[error("insufficient valid speeds: {found} usable points, need {required}")]
    InsufficientValidSpeeds {
        /// Points with a usable speed.
        found: usize,
        /// Points required.
        required: usize,
    },

    /// The flight did not cover enough headings.
    #[error("insufficient directional coverage: {found} of {required} required headings")]
    InsufficientDirectionalCoverage {
        /// Octants with enough samples.
        found: usize,
        /// Octants required.
        required: usize,
    },
}

/// Runs the estimation pipeline with a fixed configuration.
///
/// Holds only immutable configuration, so one estimator can be shared across
/// threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindEstimator {
    config: EngineConfig,
    trim: TrimModel,
}

impl WindEstimator {
    /// Create an estimator with the default thresholds and trim table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator with custom thresholds and trim model.
    #[must_use]
    pub fn with_config(config: EngineConfig, trim: TrimModel) -> Self {
        Self { config, trim }
    }

    /// Create an estimator from the application configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_config(
            config.engine.clone(),
            TrimModel::from_config(&config.trim, &config.engine),
        )
    }

    /// The thresholds in use.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The trim model in use.
    #[must_use]
    pub fn trim_model(&self) -> &TrimModel {
        &self.trim
    }

    /// Expected trim airspeed (m/s) for `wing`.
    #[must_use]
    pub fn expected_airspeed(&self, wing: &WingProfile) -> f64 {
        self.trim.expected_airspeed(wing)
    }

    /// Estimate the wind, or `None` if the track cannot support it.
    #[must_use]
    pub fn estimate(&self, track: &[GpsTrackPoint], wing: &WingProfile) -> Option<WindEstimation> {
        match self.analyze(track, wing) {
            Ok(estimation) => Some(estimation),
            Err(reason) => {
                debug!(%reason, "No wind estimate");
                None
            }
        }
    }

    /// Estimate the wind, reporting why when no estimate is possible.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] that stopped the pipeline. Rejections are an
    /// expected outcome for short or straight flights.
    pub fn analyze(
        &self,
        track: &[GpsTrackPoint],
        wing: &WingProfile,
    ) -> Result<WindEstimation, Rejection> {
        let samples = filter::validate_track(track, &self.config)?;
        let segments = filter::build_segments(&samples, &self.config);
        debug!(
            points = track.len(),
            valid = samples.len(),
            segments = segments.len(),
            "Built segments"
        );

        let profile = aggregate::aggregate(
            &segments,
            self.config.min_directions,
            self.config.min_samples_per_direction,
        )?;
        debug!(
            directions = profile.directions_with_data(),
            fastest = aggregate::OCTANT_LABELS[profile.max.octant],
            fastest_median = profile.max.median,
            slowest = aggregate::OCTANT_LABELS[profile.min.octant],
            slowest_median = profile.min.median,
            "Aggregated headings"
        );

        let expected_airspeed = self.trim.expected_airspeed(wing);

        let wind = match solver::solve(
            profile.max,
            profile.min,
            &segments,
            expected_airspeed,
            self.config.low_wind_floor,
        ) {
            Solution::Measured(wind) => wind,
            Solution::BelowResolution { wind_speed } => {
                debug!(wind_speed, "Wind below resolution");
                return Ok(WindEstimation::below_resolution());
            }
        };

        let confidence = confidence::score(&ConfidenceInputs {
            directions_with_data: profile.directions_with_data(),
            total_segments: segments.len(),
            speed_difference: profile.speed_difference(),
            variance: wind.variance,
            trim_delta: wind.trim_delta,
            has_pilot_weight: wing.has_pilot_weight(),
            has_wing_size: wing.has_wing_size(),
            max_median_speed: profile.max.median,
            expected_airspeed,
            wind_speed: wind.speed,
        });

        debug!(
            speed = wind.speed,
            direction = wind.direction,
            confidence,
            expected_airspeed,
            estimated_airspeed = wind.estimated_airspeed,
            "Estimated wind"
        );

        Ok(WindEstimation {
            speed: wind.speed,
            speed_min: wind.speed_min,
            speed_max: wind.speed_max,
            direction: wind.direction,
            confidence: confidence.clamp(0.0, 1.0),
            method: EstimationMethod::GroundSpeedVariation,
        })
    }
}

/// Estimate the wind for a track with the default configuration.
///
/// Returns `None` when the track is too short, has too few usable speeds, or
/// covers too few headings.
#[must_use]
pub fn estimate(
    track: &[GpsTrackPoint],
    wing_type: Option<&str>,
    wing_size: Option<f64>,
    pilot_weight: Option<f64>,
) -> Option<WindEstimation> {
    let wing = WingProfile {
        wing_type: wing_type.map(str::to_string),
        wing_size,
        pilot_weight,
    };
    WindEstimator::new().estimate(track, &wing)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Synthetic tracks for engine tests.

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::track::GpsTrackPoint;

    /// Metres per degree of latitude, close enough for tiny steps.
    const METERS_PER_DEGREE: f64 = 111_320.0;

    /// Builds a track one straight step at a time, one second apart.
    #[derive(Debug)]
    pub struct TrackBuilder {
        points: Vec<GpsTrackPoint>,
        time: DateTime<Utc>,
    }

    impl TrackBuilder {
        pub fn new(first_speed: f64) -> Self {
            let time = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
            Self {
                points: vec![GpsTrackPoint::new(46.5, 8.0, time).with_speed(first_speed)],
                time,
            }
        }

        /// Move 20 m along `heading`, arriving with `speed`.
        pub fn step(mut self, heading: f64, speed: f64) -> Self {
            let last = self.points.last().unwrap().clone();
            let distance = 20.0;
            let rad = heading.to_radians();
            let d_lat = distance * rad.cos() / METERS_PER_DEGREE;
            let d_lon =
                distance * rad.sin() / (METERS_PER_DEGREE * last.latitude.to_radians().cos());
            self.time += Duration::seconds(1);
            self.points.push(
                GpsTrackPoint::new(last.latitude + d_lat, last.longitude + d_lon, self.time)
                    .with_speed(speed),
            );
            self
        }

        /// Fly `repeats` steps at each `(heading, speed)` in turn.
        pub fn legs(mut self, legs: &[(f64, f64)], repeats: usize) -> Self {
            for &(heading, speed) in legs {
                for _ in 0..repeats {
                    self = self.step(heading, speed);
                }
            }
            self
        }

        pub fn build(self) -> Vec<GpsTrackPoint> {
            self.points
        }
    }

    /// Ground speed by octant for a wind from the south: fast northbound.
    pub const SOUTH_WIND_PATTERN: [(f64, f64); 8] = [
        (0.0, 12.0),
        (45.0, 10.0),
        (90.0, 8.0),
        (135.0, 6.0),
        (180.0, 5.0),
        (225.0, 6.0),
        (270.0, 8.0),
        (315.0, 10.0),
    ];

    pub fn circling_track(pattern: &[(f64, f64)], repeats: usize) -> Vec<GpsTrackPoint> {
        TrackBuilder::new(8.0).legs(pattern, repeats).build()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{circling_track, TrackBuilder, SOUTH_WIND_PATTERN};
    use super::*;

    #[test]
    fn test_circle_scenario() {
        let track = circling_track(&SOUTH_WIND_PATTERN, 3);
        let wind = estimate(&track, None, None, None).unwrap();

        assert!((wind.speed - 3.5).abs() < 1e-9);
        assert_eq!(wind.direction, 180.0);
        assert!(wind.confidence > 0.5);
        assert_eq!(wind.method, EstimationMethod::GroundSpeedVariation);
    }

    #[test]
    fn test_circle_scenario_confidence_value() {
        // 8 octants (+0.3), 24 segments (+0.12), no pilot weight (x0.9)
        let track = circling_track(&SOUTH_WIND_PATTERN, 3);
        let wind = estimate(&track, None, None, None).unwrap();
        assert!((wind.confidence - 0.92 * 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_invariants_hold() {
        let track = circling_track(&SOUTH_WIND_PATTERN, 4);
        let wind = estimate(&track, Some("Cross"), Some(23.0), Some(85.0)).unwrap();

        assert!((0.0..360.0).contains(&wind.direction));
        assert!(0.0 <= wind.speed_min);
        assert!(wind.speed_min <= wind.speed && wind.speed <= wind.speed_max);
        assert!((0.0..=1.0).contains(&wind.confidence));
    }

    #[test]
    fn test_deterministic() {
        let track = circling_track(&SOUTH_WIND_PATTERN, 3);
        let first = estimate(&track, Some("Thermal"), Some(22.0), Some(90.0));
        let second = estimate(&track, Some("Thermal"), Some(22.0), Some(90.0));
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_track_has_no_estimate() {
        let track = TrackBuilder::new(8.0)
            .legs(&[(0.0, 10.0), (90.0, 8.0)], 2)
            .build();
        assert_eq!(track.len(), 5);

        let estimator = WindEstimator::new();
        assert!(estimator.estimate(&track, &WingProfile::new()).is_none());
        assert!(matches!(
            estimator.analyze(&track, &WingProfile::new()),
            Err(Rejection::InsufficientSamples { found: 5, .. })
        ));
    }

    #[test]
    fn test_straight_line_has_no_estimate() {
        let track = TrackBuilder::new(9.0).legs(&[(10.0, 9.0)], 199).build();
        assert_eq!(track.len(), 200);

        let result = WindEstimator::new().analyze(&track, &WingProfile::new());
        assert_eq!(
            result,
            Err(Rejection::InsufficientDirectionalCoverage {
                found: 1,
                required: 3
            })
        );
        assert!(estimate(&track, None, None, None).is_none());
    }

    #[test]
    fn test_noisy_speeds_have_no_estimate() {
        let mut track = circling_track(&SOUTH_WIND_PATTERN, 3);
        for point in track.iter_mut().skip(2) {
            point.speed = Some(75.0);
        }
        assert!(matches!(
            WindEstimator::new().analyze(&track, &WingProfile::new()),
            Err(Rejection::InsufficientValidSpeeds { found: 2, .. })
        ));
    }

    #[test]
    fn test_reversed_wind_flips_direction() {
        let reversed: Vec<(f64, f64)> = SOUTH_WIND_PATTERN
            .iter()
            .map(|&(heading, _)| {
                let opposite = (heading + 180.0) % 360.0;
                let speed = SOUTH_WIND_PATTERN
                    .iter()
                    .find(|(h, _)| *h == opposite)
                    .map(|(_, s)| *s)
                    .unwrap();
                (heading, speed)
            })
            .collect();

        let south = estimate(&circling_track(&SOUTH_WIND_PATTERN, 3), None, None, None).unwrap();
        let north = estimate(&circling_track(&reversed, 3), None, None, None).unwrap();

        assert!((south.speed - north.speed).abs() < 1e-9);
        assert_eq!((south.direction + 180.0) % 360.0, north.direction);
        assert_eq!(north.direction, 0.0);
    }

    #[test]
    fn test_light_wind_below_resolution() {
        let pattern = [
            (0.0, 10.0),
            (45.0, 10.5),
            (90.0, 11.0),
            (135.0, 11.5),
            (180.0, 11.8),
            (225.0, 11.0),
            (270.0, 10.4),
            (315.0, 10.2),
        ];
        let wind = estimate(&circling_track(&pattern, 3), None, None, None).unwrap();

        assert_eq!(wind, WindEstimation::below_resolution());
        assert_eq!(wind.speed, 0.0);
        assert_eq!(wind.speed_max, 2.0);
        assert_eq!(wind.confidence, 0.3);
        assert!(wind.is_below_resolution());
    }

    #[test]
    fn test_full_profile_raises_confidence() {
        let track = circling_track(&SOUTH_WIND_PATTERN, 3);
        let bare = estimate(&track, None, None, None).unwrap();
        let full = estimate(&track, None, Some(20.0), Some(100.0)).unwrap();
        assert!(full.confidence > bare.confidence);
        assert_eq!(full.speed, bare.speed);
    }

    #[test]
    fn test_custom_thresholds() {
        let track = circling_track(&SOUTH_WIND_PATTERN, 3);
        let config = EngineConfig {
            min_directions: 8,
            min_samples_per_direction: 4,
            ..EngineConfig::default()
        };
        let estimator = WindEstimator::with_config(config, TrimModel::default());

        assert!(matches!(
            estimator.analyze(&track, &WingProfile::new()),
            Err(Rejection::InsufficientDirectionalCoverage { found: 0, required: 8 })
        ));
    }

    #[test]
    fn test_from_config_uses_trim_table() {
        let mut config = Config::default();
        config.trim.speeds_kmh.insert("Tandem".to_string(), 39.6);
        let estimator = WindEstimator::from_config(&config);

        let wing = WingProfile::new().with_wing_type("tandem");
        assert!((estimator.expected_airspeed(&wing) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_estimator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WindEstimator>();
    }

    #[test]
    fn test_rejection_display() {
        let reason = Rejection::InsufficientDirectionalCoverage {
            found: 1,
            required: 3,
        };
        assert_eq!(
            reason.to_string(),
            "insufficient directional coverage: 1 of 3 required headings"
        );
    }

    #[test]
    fn test_estimation_serializes_method_tag() {
        let json = serde_json::to_string(&WindEstimation::below_resolution()).unwrap();
        assert!(json.contains("\"method\":\"below_resolution\""));
        assert_eq!(
            EstimationMethod::GroundSpeedVariation.to_string(),
            "ground_speed_variation"
        );
    }
}
