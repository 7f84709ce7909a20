//! `trackwind` - Wind estimation from recorded paraglider GPS tracks
//!
//! This library infers the ambient wind of a completed flight from the way
//! ground speed varies with heading, plus the file loading, wing metadata,
//! configuration and formatting around that engine.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod batch;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod report;
pub mod track;
pub mod units;
pub mod wing;

pub use config::Config;
pub use engine::{estimate, EstimationMethod, Rejection, WindEstimation, WindEstimator};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use report::EstimateReport;
pub use track::{FlightTrack, GpsTrackPoint};
pub use units::SpeedUnit;
pub use wing::WingProfile;
