//! Confidence heuristic for a measured wind.
//!
//! The steps run in a fixed order; the multiplicative adjustments act on the
//! running score, so reordering them changes the result.

/// Score every estimate starts from.
const BASE_SCORE: f64 = 0.5;

/// Octant count at which coverage starts earning a bonus.
const COVERAGE_BASELINE: f64 = 3.0;
const COVERAGE_STEP: f64 = 0.1;
const COVERAGE_BONUS_CAP: f64 = 0.3;

/// Segment count at which density starts earning a bonus.
const DENSITY_BASELINE: f64 = 12.0;
const DENSITY_DIVISOR: f64 = 100.0;
const DENSITY_BONUS_CAP: f64 = 0.2;

/// Fastest/slowest spread (m/s) below which the signal is weak.
const WEAK_SIGNAL_SPREAD: f64 = 3.0;
const WEAK_SIGNAL_PENALTY: f64 = 0.2;

/// Ground-speed variance above which the data is noisy.
const NOISY_VARIANCE: f64 = 25.0;
const NOISY_PENALTY: f64 = 0.15;

/// Airspeed mismatch (m/s) above which the trim model fits poorly.
const POOR_FIT_DELTA: f64 = 3.0;
const POOR_FIT_FACTOR: f64 = 0.8;

const FULL_PROFILE_FACTOR: f64 = 1.1;
const NO_WEIGHT_FACTOR: f64 = 0.9;

/// Headroom (m/s) over airspeed plus wind before ground speed is implausible.
const PLAUSIBILITY_MARGIN: f64 = 5.0;
const PLAUSIBILITY_RATIO: f64 = 1.5;
const IMPLAUSIBLE_FACTOR: f64 = 0.7;

const MIN_SCORE: f64 = 0.1;
const MAX_SCORE: f64 = 1.0;

/// Everything the heuristic looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInputs {
    /// Octants with enough samples.
    pub directions_with_data: usize,
    /// Segments that survived filtering.
    pub total_segments: usize,
    /// Fastest minus slowest octant median, m/s.
    pub speed_difference: f64,
    /// Variance of all segment ground speeds.
    pub variance: f64,
    /// Implied minus expected airspeed, absolute, m/s.
    pub trim_delta: f64,
    /// Whether a usable pilot weight was given.
    pub has_pilot_weight: bool,
    /// Whether a usable wing size was given.
    pub has_wing_size: bool,
    /// Fastest octant median, m/s.
    pub max_median_speed: f64,
    /// Expected trim airspeed, m/s.
    pub expected_airspeed: f64,
    /// Measured wind speed, m/s.
    pub wind_speed: f64,
}

/// Combine the inputs into a score in `[0.1, 1.0]`.
#[must_use]
pub fn score(inputs: &ConfidenceInputs) -> f64 {
    let mut confidence = BASE_SCORE;

    let directions = inputs.directions_with_data as f64;
    confidence += ((directions - COVERAGE_BASELINE) * COVERAGE_STEP).min(COVERAGE_BONUS_CAP);

    let segments = inputs.total_segments as f64;
    confidence += ((segments - DENSITY_BASELINE) / DENSITY_DIVISOR).min(DENSITY_BONUS_CAP);

    if inputs.speed_difference < WEAK_SIGNAL_SPREAD {
        confidence -= WEAK_SIGNAL_PENALTY;
    }

    if inputs.variance > NOISY_VARIANCE {
        confidence -= NOISY_PENALTY;
    }

    if inputs.trim_delta > POOR_FIT_DELTA {
        confidence *= POOR_FIT_FACTOR;
    }

    if inputs.has_wing_size && inputs.has_pilot_weight {
        confidence *= FULL_PROFILE_FACTOR;
    } else if !inputs.has_pilot_weight {
        confidence *= NO_WEIGHT_FACTOR;
    }

    let plausible_ceiling =
        PLAUSIBILITY_RATIO * (inputs.expected_airspeed + inputs.wind_speed + PLAUSIBILITY_MARGIN);
    if inputs.max_median_speed > plausible_ceiling {
        confidence *= IMPLAUSIBLE_FACTOR;
    }

    confidence.clamp(MIN_SCORE, MAX_SCORE)
}
