//! Track validation and segment construction.

use tracing::trace;

use super::Rejection;
use crate::config::EngineConfig;
use crate::track::GpsTrackPoint;

/// A track point whose reported ground speed passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidSample<'a> {
    /// The original point.
    pub point: &'a GpsTrackPoint,
    /// Its ground speed in m/s.
    pub speed: f64,
}

/// One step of the flight between two consecutive valid samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSegment {
    /// True heading in degrees, `[0, 360)`.
    pub heading: f64,
    /// Ground speed reported at the end of the step, in m/s.
    pub ground_speed: f64,
    /// Elapsed time in seconds.
    pub duration: f64,
}

/// Keep only points with a usable ground speed, preserving order.
///
/// A speed is usable when it is present, above zero and below
/// `max_valid_speed`.
#[must_use]
pub fn filter_valid(points: &[GpsTrackPoint], max_valid_speed: f64) -> Vec<ValidSample<'_>> {
    points
        .iter()
        .filter_map(|point| match point.speed {
            Some(speed) if speed > 0.0 && speed < max_valid_speed => {
                Some(ValidSample { point, speed })
            }
            _ => None,
        })
        .collect()
}

/// Apply the sample-count floor before and after filtering.
///
/// # Errors
///
/// Returns [`Rejection::InsufficientSamples`] if either count is below
/// `min_samples`.
pub fn validate_track<'a>(
    points: &'a [GpsTrackPoint],
    config: &EngineConfig,
) -> Result<Vec<ValidSample<'a>>, Rejection> {
    if points.len() < config.min_samples {
        return Err(Rejection::InsufficientSamples {
            found: points.len(),
            required: config.min_samples,
        });
    }

    let valid = filter_valid(points, config.max_valid_speed);
    if valid.len() < config.min_samples {
        return Err(Rejection::InsufficientValidSpeeds {
            found: valid.len(),
            required: config.min_samples,
        });
    }

    Ok(valid)
}

/// Derive a segment from every adjacent pair of valid samples.
///
/// Near-stationary steps and steps with a non-positive or overlong duration
/// are dropped.
#[must_use]
pub fn build_segments(samples: &[ValidSample<'_>], config: &EngineConfig) -> Vec<FlightSegment> {
    let mut segments = Vec::with_capacity(samples.len().saturating_sub(1));

    for pair in samples.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);

        if curr.speed <= config.min_segment_speed {
            continue;
        }

        let duration = seconds_between(prev.point, curr.point);
        if duration <= 0.0 || duration >= config.max_segment_gap_secs {
            trace!(duration, "Skipping segment across sampling gap");
            continue;
        }

        // Coincident points give a heading of 0; only corrupt coordinates
        // make it non-finite.
        let heading = initial_bearing(prev.point, curr.point);
        if !heading.is_finite() {
            continue;
        }

        segments.push(FlightSegment {
            heading,
            ground_speed: curr.speed,
            duration,
        });
    }

    segments
}

/// Great-circle initial bearing from `from` to `to`, in degrees `[0, 360)`.
#[must_use]
pub fn initial_bearing(from: &GpsTrackPoint, to: &GpsTrackPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Wrap an angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

fn seconds_between(prev: &GpsTrackPoint, curr: &GpsTrackPoint) -> f64 {
    let delta = curr.timestamp - prev.timestamp;
    // Microseconds overflow only for gaps of ~290k years.
    delta.num_microseconds().map_or_else(
        || delta.num_milliseconds() as f64 / 1_000.0,
        |micros| micros as f64 / 1_000_000.0,
    )
}
