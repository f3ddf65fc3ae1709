mod config;
mod elements;
mod pipeline;
mod predict;
mod report;
mod weather;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;

use crate::config::ConfigFile;
use crate::pipeline::CLOUD_UNKNOWN_PERCENT;
use crate::weather::{FixedCloud, MetnoClient, WeatherProvider};

#[derive(Parser)]
#[command(name = "passcast")]
#[command(about = "Predict cloud-free satellite passes over configured sites")]
struct Cli {
    /// Satellite and location definitions (YAML)
    #[arg(short, long, default_value = "passcast.yaml")]
    config: PathBuf,
    /// How many hours to look ahead
    #[arg(long)]
    look_ahead_hours: Option<u32>,
    /// Global minimum peak elevation in degrees
    #[arg(long)]
    min_elevation: Option<f64>,
    /// Maximum acceptable cloud cover in percent
    #[arg(long)]
    max_cloud_cover: Option<f64>,
    /// Skip network access: use the element snapshot and a fixed cloud value
    #[arg(long)]
    debug: bool,
    /// More detailed logging
    #[arg(short, long)]
    verbose: bool,
    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut file = match ConfigFile::load(&cli.config) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error loading {}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };

    // CLI flags override the file's options
    if let Some(hours) = cli.look_ahead_hours {
        file.options.look_ahead_hours = hours;
    }
    if let Some(elevation) = cli.min_elevation {
        file.options.min_elevation_deg = elevation;
    }
    if let Some(cloud) = cli.max_cloud_cover {
        file.options.max_cloud_cover_percent = cloud;
    }
    file.options.debug_mode |= cli.debug;
    file.options.verbose |= cli.verbose;

    let level = if file.options.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let weather: Box<dyn WeatherProvider> = if file.options.debug_mode {
        Box::new(FixedCloud(CLOUD_UNKNOWN_PERCENT))
    } else {
        match MetnoClient::new() {
            Ok(client) => Box::new(client),
            Err(e) => {
                log::error!("could not build forecast client: {e}");
                return ExitCode::FAILURE;
            }
        }
    };

    let table = match pipeline::run(
        &file.options,
        &file.satellites,
        &file.locations,
        weather.as_ref(),
    ) {
        Ok(table) => table,
        Err(e) => {
            log::error!("run failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rendered = report::render_markdown(&table, &file.satellites, &file.locations, Utc::now());

    match &cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &rendered) {
                log::error!("could not write {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
            log::info!("report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    ExitCode::SUCCESS
}
