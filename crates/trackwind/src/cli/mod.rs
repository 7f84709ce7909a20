//! Command-line interface for trackwind.
//!
//! This module provides the CLI structure for the `trackwind` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BatchCommand, ConfigCommand, EstimateCommand, FormatArg, OutputArgs, TrimCommand, UnitArg,
    WingArgs,
};

/// trackwind - Estimate the wind from a flight track
///
/// Infers wind speed and direction from how ground speed changes with
/// heading over a recorded paraglider flight. No weather data is used.
#[derive(Debug, Parser)]
#[command(name = "trackwind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate the wind for one track file
    Estimate(EstimateCommand),

    /// Estimate the wind for several track files concurrently
    Batch(BatchCommand),

    /// Show the expected trim airspeed for a wing
    Trim(TrimCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
