//! Wind speed and direction from the fastest and slowest headings.
//!
//! Flying downwind the wing covers ground at airspeed plus wind, upwind at
//! airspeed minus wind. Half the spread between the two medians is the wind
//! speed and their mean is the airspeed actually flown.

use super::aggregate::{octant_heading, OctantMedian};
use super::filter::{normalize_degrees, FlightSegment};

/// Share of the trim mismatch added to the uncertainty band.
const TRIM_UNCERTAINTY_FACTOR: f64 = 0.3;

/// Share of the ground-speed standard deviation added to the band.
const STD_DEV_BAND_FACTOR: f64 = 0.5;

/// A measured wind, before confidence scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSolution {
    /// Wind speed in m/s.
    pub speed: f64,
    /// Bearing the wind blows from, `[0, 360)`.
    pub direction: f64,
    /// Lower bound of the speed band in m/s.
    pub speed_min: f64,
    /// Upper bound of the speed band in m/s.
    pub speed_max: f64,
    /// Airspeed implied by the medians, in m/s.
    pub estimated_airspeed: f64,
    /// Distance between implied and expected airspeed, in m/s.
    pub trim_delta: f64,
    /// Variance of all segment ground speeds.
    pub variance: f64,
}

/// Outcome of the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solution {
    /// Wind large enough to resolve.
    Measured(WindSolution),
    /// Wind below the resolution floor; only the raw speed is kept for logs.
    BelowResolution {
        /// The unresolved wind speed in m/s.
        wind_speed: f64,
    },
}

/// Solve for the wind from the extreme octants.
///
/// `segments` feeds the spread of the uncertainty band; `expected_airspeed`
/// only widens the band and never overrides the measured speed.
#[must_use]
pub fn solve(
    max: OctantMedian,
    min: OctantMedian,
    segments: &[FlightSegment],
    expected_airspeed: f64,
    low_wind_floor: f64,
) -> Solution {
    let speed = (max.median - min.median) / 2.0;
    if speed < low_wind_floor {
        return Solution::BelowResolution { wind_speed: speed };
    }

    let tailwind_heading = octant_heading(max.octant);
    let direction = normalize_degrees(tailwind_heading + 180.0);

    let estimated_airspeed = (max.median + min.median) / 2.0;
    let trim_delta = (estimated_airspeed - expected_airspeed).abs();

    let std_dev = sample_std_dev(segments.iter().map(|s| s.ground_speed));
    let spread = STD_DEV_BAND_FACTOR * std_dev + TRIM_UNCERTAINTY_FACTOR * trim_delta;

    Solution::Measured(WindSolution {
        speed,
        direction,
        speed_min: (speed - spread).max(0.0),
        speed_max: speed + spread,
        estimated_airspeed,
        trim_delta,
        variance: std_dev * std_dev,
    })
}

/// Sample (n − 1) standard deviation; zero for fewer than two values.
#[must_use]
pub fn sample_std_dev(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let (count, sum) = values
        .clone()
        .fold((0_usize, 0.0), |(n, sum), v| (n + 1, sum + v));
    if count < 2 {
        return 0.0;
    }

    let mean = sum / count as f64;
    let squares: f64 = values.map(|v| (v - mean).powi(2)).sum();
    (squares / (count - 1) as f64).sqrt()
}
