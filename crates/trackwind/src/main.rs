//! `trackwind` - CLI for wind estimation
//!
//! This binary loads recorded flight tracks, runs the wind estimator and
//! prints the results.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use trackwind::batch::{entries_to_json, estimate_files, estimate_track};
use trackwind::cli::{BatchCommand, Cli, Command, ConfigCommand, EstimateCommand, TrimCommand};
use trackwind::config::OutputFormat;
use trackwind::{init_logging, Config, FlightTrack, WindEstimator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Estimate(estimate_cmd) => handle_estimate(&config, &estimate_cmd),
        Command::Batch(batch_cmd) => handle_batch(&config, batch_cmd),
        Command::Trim(trim_cmd) => handle_trim(&config, &trim_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_estimate(
    config: &Config,
    cmd: &EstimateCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = cmd.wing.to_profile()?;
    let (unit, format) = cmd.output.resolve(&config.output);

    let track = FlightTrack::load(&cmd.file)?;
    let estimator = WindEstimator::from_config(config);
    let report = estimate_track(&estimator, cmd.file.clone(), &track, overrides);

    match format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Plain => print!("{}", report.render_plain(unit)),
    }
    Ok(())
}

fn handle_batch(config: &Config, cmd: BatchCommand) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = cmd.wing.to_profile()?;
    let (unit, format) = cmd.output.resolve(&config.output);
    let max_concurrent = cmd.max_concurrent.unwrap_or(config.batch.max_concurrent);
    let estimator = Arc::new(WindEstimator::from_config(config));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let entries = runtime.block_on(estimate_files(
        estimator,
        cmd.files,
        overrides,
        max_concurrent,
    ));

    match format {
        OutputFormat::Json => println!("{}", entries_to_json(&entries)?),
        OutputFormat::Plain => {
            for entry in &entries {
                match &entry.result {
                    Ok(report) => print!("{}", report.render_plain(unit)),
                    Err(e) => {
                        println!("{}", entry.path.display());
                        println!("  Error:        {e}");
                    }
                }
            }
        }
    }

    let estimated = entries
        .iter()
        .filter(|entry| matches!(&entry.result, Ok(report) if report.estimate.is_some()))
        .count();
    info!(files = entries.len(), estimated, "Batch complete");
    Ok(())
}

fn handle_trim(config: &Config, cmd: &TrimCommand) -> Result<(), Box<dyn std::error::Error>> {
    let wing = cmd.wing.to_profile()?;
    let unit = cmd.units.map_or(config.output.units, Into::into);
    let estimator = WindEstimator::from_config(config);

    println!(
        "Wing type:      {}",
        wing.wing_type.as_deref().unwrap_or("(default)")
    );
    if let Some(loading) = wing.wing_loading() {
        println!("Wing loading:   {loading:.2} kg/m²");
    }
    println!(
        "Trim speed:     {:.1} {unit}",
        unit.from_mps(estimator.expected_airspeed(&wing))
    );
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let engine = &config.engine;
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Engine]");
                println!("  Min samples:           {}", engine.min_samples);
                println!("  Max valid speed:       {} m/s", engine.max_valid_speed);
                println!("  Min segment speed:     {} m/s", engine.min_segment_speed);
                println!("  Max segment gap:       {} s", engine.max_segment_gap_secs);
                println!("  Min directions:        {}", engine.min_directions);
                println!(
                    "  Samples per direction: {}",
                    engine.min_samples_per_direction
                );
                println!("  Low wind floor:        {} m/s", engine.low_wind_floor);
                println!();
                println!("[Trim]");
                println!("  Default:               {} km/h", config.trim.default_kmh);
                for (wing_type, kmh) in &config.trim.speeds_kmh {
                    println!("  {:<22} {kmh} km/h", format!("{wing_type}:"));
                }
                println!();
                println!("[Output]");
                println!("  Units:                 {}", config.output.units);
                println!("  Format:                {:?}", config.output.format);
                println!();
                println!("[Batch]");
                println!("  Max concurrent:        {}", config.batch.max_concurrent);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
