//! Presentation of wind estimates.

use std::path::PathBuf;

use serde::Serialize;

use crate::engine::aggregate::{octant_of, OCTANT_LABELS};
use crate::engine::{Rejection, WindEstimation};
use crate::error::Result;
use crate::units::SpeedUnit;
use crate::wing::WingProfile;

/// Compass label (N, NE, … NW) for a bearing.
#[must_use]
pub fn cardinal_label(direction: f64) -> &'static str {
    OCTANT_LABELS[octant_of(direction)]
}

/// Coarse bucket for a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Below 0.4.
    Low,
    /// 0.4 up to 0.7.
    Moderate,
    /// 0.7 and above.
    High,
}

impl ConfidenceLevel {
    /// Bucket a score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 0.4 {
            Self::Low
        } else if score < 0.7 {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
        }
    }
}

impl WindEstimation {
    /// Compass label of the wind direction.
    #[must_use]
    pub fn cardinal(&self) -> &'static str {
        cardinal_label(self.direction)
    }

    /// Coarse confidence bucket.
    #[must_use]
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }

    /// One-line description, e.g. `13 km/h from S (9–17 km/h), high confidence`.
    #[must_use]
    pub fn summary(&self, unit: SpeedUnit) -> String {
        if self.is_below_resolution() {
            return format!(
                "light wind (< {:.0} {unit}), {} confidence",
                unit.from_mps(self.speed_max).ceil(),
                self.confidence_level()
            );
        }

        format!(
            "{:.0} {unit} from {} ({:.0}–{:.0} {unit}), {} confidence",
            unit.from_mps(self.speed),
            self.cardinal(),
            unit.from_mps(self.speed_min),
            unit.from_mps(self.speed_max),
            self.confidence_level()
        )
    }
}

/// Outcome of estimating one track, ready for printing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateReport {
    /// Where the track came from.
    pub source: PathBuf,
    /// Number of points in the track.
    pub points: usize,
    /// Wing metadata that was used.
    pub wing: WingProfile,
    /// Expected trim airspeed in m/s.
    pub expected_airspeed: f64,
    /// The estimate, if one was possible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<WindEstimation>,
    /// Why no estimate was possible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EstimateReport {
    /// Build a report from an analysis result.
    #[must_use]
    pub fn new(
        source: PathBuf,
        points: usize,
        wing: WingProfile,
        expected_airspeed: f64,
        outcome: std::result::Result<WindEstimation, Rejection>,
    ) -> Self {
        let (estimate, reason) = match outcome {
            Ok(estimate) => (Some(estimate), None),
            Err(rejection) => (None, Some(rejection.to_string())),
        };
        Self {
            source,
            points,
            wing,
            expected_airspeed,
            estimate,
            reason,
        }
    }

    /// Pretty-printed JSON form of the report.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable block describing the report.
    #[must_use]
    pub fn render_plain(&self, unit: SpeedUnit) -> String {
        let mut out = format!("{}\n", self.source.display());
        out.push_str(&format!("  Points:       {}\n", self.points));
        out.push_str(&format!(
            "  Trim speed:   {:.1} {unit}\n",
            unit.from_mps(self.expected_airspeed)
        ));

        match (&self.estimate, &self.reason) {
            (Some(wind), _) => {
                out.push_str(&format!("  Wind:         {}\n", wind.summary(unit)));
                if !wind.is_below_resolution() {
                    out.push_str(&format!(
                        "  Direction:    {:.0}° ({})\n",
                        wind.direction,
                        wind.cardinal()
                    ));
                }
                out.push_str(&format!("  Confidence:   {:.2}\n", wind.confidence));
            }
            (None, reason) => {
                out.push_str(&format!(
                    "  Wind:         no estimate ({})\n",
                    reason.as_deref().unwrap_or("unknown reason")
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EstimationMethod;

    fn sample_wind() -> WindEstimation {
        WindEstimation {
            speed: 3.5,
            speed_min: 2.5,
            speed_max: 4.75,
            direction: 180.0,
            confidence: 0.83,
            method: EstimationMethod::GroundSpeedVariation,
        }
    }

    #[test]
    fn test_cardinal_labels() {
        assert_eq!(cardinal_label(0.0), "N");
        assert_eq!(cardinal_label(44.0), "NE");
        assert_eq!(cardinal_label(180.0), "S");
        assert_eq!(cardinal_label(250.0), "W");
        assert_eq!(cardinal_label(350.0), "N");
    }

    #[test]
    fn test_confidence_levels() {
        assert_eq!(ConfidenceLevel::from_score(0.1), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.4), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_score(0.69), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_score(0.7), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::High.to_string(), "high");
    }

    #[test]
    fn test_summary_kmh() {
        assert_eq!(
            sample_wind().summary(SpeedUnit::KilometersPerHour),
            "13 km/h from S (9–17 km/h), high confidence"
        );
    }

    #[test]
    fn test_summary_knots() {
        let summary = sample_wind().summary(SpeedUnit::Knots);
        assert!(summary.starts_with("7 kt from S"));
    }

    #[test]
    fn test_summary_below_resolution() {
        let summary = WindEstimation::below_resolution().summary(SpeedUnit::KilometersPerHour);
        assert_eq!(summary, "light wind (< 8 km/h), low confidence");
    }

    #[test]
    fn test_report_with_estimate() {
        let report = EstimateReport::new(
            PathBuf::from("flight.json"),
            25,
            WingProfile::new(),
            10.0,
            Ok(sample_wind()),
        );
        let text = report.render_plain(SpeedUnit::MetersPerSecond);

        assert!(text.starts_with("flight.json\n"));
        assert!(text.contains("Points:       25"));
        assert!(text.contains("Trim speed:   10.0 m/s"));
        assert!(text.contains("Direction:    180° (S)"));
        assert!(text.contains("Confidence:   0.83"));
    }

    #[test]
    fn test_report_without_estimate() {
        let report = EstimateReport::new(
            PathBuf::from("short.json"),
            5,
            WingProfile::new(),
            10.0,
            Err(Rejection::InsufficientSamples {
                found: 5,
                required: 12,
            }),
        );
        assert!(report.estimate.is_none());

        let text = report.render_plain(SpeedUnit::KilometersPerHour);
        assert!(text.contains("no estimate (insufficient samples: 5 points, need 12)"));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("estimate").is_none());
        assert_eq!(json["reason"], "insufficient samples: 5 points, need 12");
    }

    #[test]
    fn test_report_json_contains_estimate() {
        let report = EstimateReport::new(
            PathBuf::from("flight.json"),
            25,
            WingProfile::new().with_wing_type("Cross"),
            11.1,
            Ok(sample_wind()),
        );
        let json: serde_json::Value =
            serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["estimate"]["direction"], 180.0);
        assert_eq!(json["estimate"]["method"], "ground_speed_variation");
        assert_eq!(json["wing"]["wing_type"], "Cross");
        assert!(json.get("reason").is_none());
    }
}
