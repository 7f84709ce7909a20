//! Directional aggregation of segments into heading octants.

use std::collections::BTreeMap;

use tracing::trace;

use super::filter::{normalize_degrees, FlightSegment};
use super::Rejection;

/// Number of heading octants.
pub const OCTANT_COUNT: usize = 8;

/// Width of one octant in degrees.
pub const OCTANT_WIDTH: f64 = 45.0;

/// Compass labels for the octants, clockwise from north.
pub const OCTANT_LABELS: [&str; OCTANT_COUNT] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Octant (0 = N … 7 = NW) whose 45° span is centred on `heading`'s compass point.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn octant_of(heading: f64) -> usize {
    let shifted = normalize_degrees(heading) + OCTANT_WIDTH / 2.0;
    (shifted / OCTANT_WIDTH).floor() as usize % OCTANT_COUNT
}

/// Centre heading of an octant in degrees.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn octant_heading(octant: usize) -> f64 {
    (octant % OCTANT_COUNT) as f64 * OCTANT_WIDTH
}

/// Median ground speed of one octant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctantMedian {
    /// Octant index, 0–7.
    pub octant: usize,
    /// Median ground speed in m/s.
    pub median: f64,
}

/// Ground speed by heading, reduced to per-octant medians.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalProfile {
    /// Segments per octant, including octants that did not qualify.
    pub counts: [usize; OCTANT_COUNT],
    /// Median speed of every qualifying octant.
    pub medians: BTreeMap<usize, f64>,
    /// Fastest octant: the tailwind heading.
    pub max: OctantMedian,
    /// Slowest octant: the headwind heading.
    pub min: OctantMedian,
}

impl DirectionalProfile {
    /// Number of octants with enough samples to count.
    #[must_use]
    pub fn directions_with_data(&self) -> usize {
        self.medians.len()
    }

    /// Difference between the fastest and slowest medians.
    #[must_use]
    pub fn speed_difference(&self) -> f64 {
        self.max.median - self.min.median
    }
}

/// Bucket segments by octant and reduce each covered octant to its median.
///
/// An octant is covered once it holds `min_samples_per_direction` segments.
/// Ties between equal medians go to the lowest octant index.
///
/// # Errors
///
/// Returns [`Rejection::InsufficientDirectionalCoverage`] when fewer than
/// `min_directions` octants are covered.
pub fn aggregate(
    segments: &[FlightSegment],
    min_directions: usize,
    min_samples_per_direction: usize,
) -> Result<DirectionalProfile, Rejection> {
    let mut buckets: [Vec<f64>; OCTANT_COUNT] = Default::default();
    for segment in segments {
        buckets[octant_of(segment.heading)].push(segment.ground_speed);
    }

    let counts: [usize; OCTANT_COUNT] = std::array::from_fn(|i| buckets[i].len());

    let medians: BTreeMap<usize, f64> = buckets
        .iter_mut()
        .enumerate()
        .filter(|(_, speeds)| speeds.len() >= min_samples_per_direction)
        .filter_map(|(octant, speeds)| median(speeds).map(|m| (octant, m)))
        .collect();

    for (octant, median) in &medians {
        trace!(
            octant = OCTANT_LABELS[*octant],
            samples = counts[*octant],
            median,
            "Octant median"
        );
    }

    let coverage = medians.len();
    let rejection = Rejection::InsufficientDirectionalCoverage {
        found: coverage,
        required: min_directions,
    };
    if coverage < min_directions {
        return Err(rejection);
    }

    let (Some(max), Some(min)) = (
        extreme(&medians, |a, b| a > b),
        extreme(&medians, |a, b| a < b),
    ) else {
        return Err(rejection);
    };

    Ok(DirectionalProfile {
        counts,
        medians,
        max,
        min,
    })
}

/// First octant whose median beats every other under `better`.
fn extreme(
    medians: &BTreeMap<usize, f64>,
    better: impl Fn(f64, f64) -> bool,
) -> Option<OctantMedian> {
    medians
        .iter()
        .fold(None, |best: Option<OctantMedian>, (&octant, &median)| match best {
            Some(current) if !better(median, current.median) => Some(current),
            _ => Some(OctantMedian { octant, median }),
        })
}

/// Median of `values`, sorting them in place. `None` when empty.
#[must_use]
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
