//! Estimating many track files at once.
//!
//! Files are read with `tokio::fs` and each estimate runs on the blocking
//! pool. A semaphore caps how many files are in flight.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::engine::WindEstimator;
use crate::error::{Error, Result};
use crate::report::EstimateReport;
use crate::track::FlightTrack;
use crate::wing::WingProfile;

/// The outcome for one file of a batch.
#[derive(Debug)]
pub struct BatchEntry {
    /// The track file.
    pub path: PathBuf,
    /// The report, or why the file could not be processed.
    pub result: Result<EstimateReport>,
}

/// Estimate the wind for a loaded track.
///
/// Wing metadata from the file is used first, then `overrides` is laid on
/// top of it.
#[must_use]
pub fn estimate_track(
    estimator: &WindEstimator,
    source: PathBuf,
    track: &FlightTrack,
    overrides: WingProfile,
) -> EstimateReport {
    let wing = track.wing_profile().merged_with(overrides);
    let expected_airspeed = estimator.expected_airspeed(&wing);
    let outcome = estimator.analyze(&track.points, &wing);
    EstimateReport::new(source, track.len(), wing, expected_airspeed, outcome)
}

/// Estimate the wind for every file in `paths`.
///
/// Entries come back in the order of `paths`. A file that cannot be read or
/// parsed produces an error entry and the rest of the batch carries on.
pub async fn estimate_files(
    estimator: Arc<WindEstimator>,
    paths: Vec<PathBuf>,
    overrides: WingProfile,
    max_concurrent: usize,
) -> Vec<BatchEntry> {
    let total = paths.len();
    info!(files = total, max_concurrent, "Starting batch");

    let permits = max_concurrent.clamp(1, Semaphore::MAX_PERMITS);
    let semaphore = Arc::new(Semaphore::new(permits));
    let mut tasks = JoinSet::new();

    for (index, path) in paths.iter().cloned().enumerate() {
        let estimator = Arc::clone(&estimator);
        let semaphore = Arc::clone(&semaphore);
        let overrides = overrides.clone();
        tasks.spawn(async move {
            // The semaphore is never closed, so acquiring only waits.
            let _permit = semaphore.acquire_owned().await.ok();
            (index, estimate_file(estimator, path, overrides).await)
        });
    }

    let mut results: Vec<Option<Result<EstimateReport>>> = (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => warn!(error = %e, "Batch task did not complete"),
        }
    }

    let entries: Vec<BatchEntry> = paths
        .into_iter()
        .zip(results)
        .map(|(path, result)| {
            let result = result
                .unwrap_or_else(|| Err(Error::internal("estimate task did not complete")));
            if let Err(e) = &result {
                warn!(path = %path.display(), error = %e, "Skipping track");
            }
            BatchEntry { path, result }
        })
        .collect();

    let failed = entries.iter().filter(|entry| entry.result.is_err()).count();
    info!(files = total, failed, "Batch finished");
    entries
}

/// Pretty-printed JSON array of a batch: reports for processed files, and
/// `{ "source", "error" }` objects for files that failed.
///
/// # Errors
///
/// Returns [`Error::Json`] if a report cannot be serialized.
pub fn entries_to_json(entries: &[BatchEntry]) -> Result<String> {
    let values = entries
        .iter()
        .map(|entry| match &entry.result {
            Ok(report) => serde_json::to_value(report),
            Err(e) => Ok(serde_json::json!({
                "source": entry.path,
                "error": e.to_string(),
            })),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(serde_json::to_string_pretty(&values)?)
}

async fn estimate_file(
    estimator: Arc<WindEstimator>,
    path: PathBuf,
    overrides: WingProfile,
) -> Result<EstimateReport> {
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| Error::TrackRead {
            path: path.clone(),
            source,
        })?;

    tokio::task::spawn_blocking(move || -> Result<EstimateReport> {
        let track = parse_track(&path, &contents)?;
        debug!(path = %path.display(), points = track.len(), "Estimating track");
        Ok(estimate_track(&estimator, path, &track, overrides))
    })
    .await
    .map_err(|e| Error::internal(format!("estimate task failed: {e}")))?
}

fn parse_track(path: &Path, contents: &str) -> Result<FlightTrack> {
    FlightTrack::from_json_str(contents).map_err(|source| Error::TrackParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{circling_track, SOUTH_WIND_PATTERN};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn circle_json() -> String {
        serde_json::to_string(&circling_track(&SOUTH_WIND_PATTERN, 3)).unwrap()
    }

    #[test]
    fn test_estimate_track_merges_overrides() {
        let mut track = FlightTrack::from_points(circling_track(&SOUTH_WIND_PATTERN, 3));
        track.wing_type = Some("Thermal".to_string());
        track.pilot_weight = Some(70.0);

        let report = estimate_track(
            &WindEstimator::new(),
            PathBuf::from("flight.json"),
            &track,
            WingProfile::new().with_pilot_weight(85.0),
        );

        assert_eq!(report.wing.wing_type.as_deref(), Some("Thermal"));
        assert_eq!(report.wing.pilot_weight, Some(85.0));
        assert!((report.expected_airspeed - 38.0 / 3.6).abs() < 1e-12);
        assert_eq!(report.estimate.unwrap().direction, 180.0);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write_file(&dir, "a.json", &circle_json()),
            write_file(&dir, "b.json", "[]"),
            write_file(&dir, "c.json", &circle_json()),
        ];

        let entries = estimate_files(
            Arc::new(WindEstimator::new()),
            paths.clone(),
            WingProfile::new(),
            2,
        )
        .await;

        assert_eq!(entries.len(), 3);
        for (entry, path) in entries.iter().zip(&paths) {
            assert_eq!(&entry.path, path);
        }

        let first = entries[0].result.as_ref().unwrap();
        assert!(first.estimate.is_some());

        let empty = entries[1].result.as_ref().unwrap();
        assert!(empty.estimate.is_none());
        assert_eq!(empty.points, 0);

        assert!(entries[2].result.as_ref().unwrap().estimate.is_some());
    }

    #[tokio::test]
    async fn test_batch_continues_after_failures() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            dir.path().join("missing.json"),
            write_file(&dir, "broken.json", "{ not json"),
            write_file(&dir, "good.json", &circle_json()),
        ];

        let entries =
            estimate_files(Arc::new(WindEstimator::new()), paths, WingProfile::new(), 1).await;

        assert!(matches!(entries[0].result, Err(Error::TrackRead { .. })));
        assert!(matches!(entries[1].result, Err(Error::TrackParse { .. })));
        assert!(entries[2].result.as_ref().unwrap().estimate.is_some());
    }

    #[tokio::test]
    async fn test_batch_empty() {
        let entries =
            estimate_files(Arc::new(WindEstimator::new()), Vec::new(), WingProfile::new(), 4)
                .await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_batch_oversized_concurrency_is_capped() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            dir.path().join("missing.json"),
            write_file(&dir, "a.json", &circle_json()),
        ];

        let entries = estimate_files(
            Arc::new(WindEstimator::new()),
            paths,
            WingProfile::new(),
            usize::MAX,
        )
        .await;
        assert!(matches!(entries[0].result, Err(Error::TrackRead { .. })));
        assert!(entries[1].result.is_ok());
    }

    #[tokio::test]
    async fn test_entries_to_json_mixes_reports_and_errors() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write_file(&dir, "good.json", &circle_json()),
            dir.path().join("missing.json"),
        ];
        let entries =
            estimate_files(Arc::new(WindEstimator::new()), paths, WingProfile::new(), 2).await;

        let json: serde_json::Value =
            serde_json::from_str(&entries_to_json(&entries).unwrap()).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["estimate"]["direction"], 180.0);
        assert!(items[1]["error"]
            .as_str()
            .unwrap()
            .starts_with("failed to read track"));
        assert!(items[1].get("estimate").is_none());
    }

    #[tokio::test]
    async fn test_batch_zero_concurrency_still_runs() {
        let dir = TempDir::new().unwrap();
        let paths = vec![write_file(&dir, "a.json", &circle_json())];

        let entries =
            estimate_files(Arc::new(WindEstimator::new()), paths, WingProfile::new(), 0).await;
        assert!(entries[0].result.is_ok());
    }
}
