//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Error, Result};
use crate::units::SpeedUnit;
use crate::wing::{require_wing_size, WingProfile};

/// Estimate command arguments.
#[derive(Debug, Args)]
pub struct EstimateCommand {
    /// Track file (JSON)
    pub file: PathBuf,

    /// Wing metadata
    #[command(flatten)]
    pub wing: WingArgs,

    /// Output options
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Batch command arguments.
#[derive(Debug, Args)]
pub struct BatchCommand {
    /// Track files (JSON)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Maximum number of files processed at once
    #[arg(short = 'j', long, value_name = "N")]
    pub max_concurrent: Option<usize>,

    /// Wing metadata
    #[command(flatten)]
    pub wing: WingArgs,

    /// Output options
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Trim command arguments.
#[derive(Debug, Args)]
pub struct TrimCommand {
    /// Wing metadata
    #[command(flatten)]
    pub wing: WingArgs,

    /// Speed unit
    #[arg(short, long, value_enum)]
    pub units: Option<UnitArg>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Wing metadata given on the command line.
///
/// Any flag set here overrides the same field stored in the track file.
#[derive(Debug, Clone, Default, Args)]
pub struct WingArgs {
    /// Wing category (soaring, cross, thermal, speedflying, acro)
    #[arg(long, value_name = "TYPE")]
    pub wing_type: Option<String>,

    /// Projected wing area, e.g. "22" or "23.5 m²"
    #[arg(long, value_name = "SIZE")]
    pub wing_size: Option<String>,

    /// Pilot weight in kg
    #[arg(long, value_name = "KG")]
    pub pilot_weight: Option<f64>,
}

impl WingArgs {
    /// Convert the flags into a wing profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the wing size cannot be read or the pilot weight
    /// is not a positive number.
    pub fn to_profile(&self) -> Result<WingProfile> {
        let wing_size = self
            .wing_size
            .as_deref()
            .map(require_wing_size)
            .transpose()?;

        if let Some(value) = self.pilot_weight {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidPilotWeight { value });
            }
        }

        Ok(WingProfile {
            wing_type: self.wing_type.clone(),
            wing_size,
            pilot_weight: self.pilot_weight,
        })
    }
}

/// Output flags shared by the estimate commands.
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Speed unit
    #[arg(short, long, value_enum)]
    pub units: Option<UnitArg>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

impl OutputArgs {
    /// Resolve the unit and format, falling back to the configured ones.
    #[must_use]
    pub fn resolve(&self, config: &OutputConfig) -> (SpeedUnit, OutputFormat) {
        (
            self.units.map_or(config.units, SpeedUnit::from),
            self.format.map_or(config.format, OutputFormat::from),
        )
    }
}

/// Speed unit argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    /// Metres per second
    Mps,
    /// Kilometres per hour
    Kmh,
    /// Knots
    Knots,
}

impl From<UnitArg> for SpeedUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Mps => Self::MetersPerSecond,
            UnitArg::Kmh => Self::KilometersPerHour,
            UnitArg::Knots => Self::Knots,
        }
    }
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Human-readable text
    Plain,
    /// JSON output
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => Self::Plain,
            FormatArg::Json => Self::Json,
        }
    }
}
