//! Command implementations for the bufkit CLI

use super::{Args, Commands};
use crate::models::{Bulletin, ForecastHour};
use crate::processor::BatchProcessor;
use crate::source::{bulletin_url, load_bulletin};
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use tracing::{Level, debug};

/// Run the selected command
pub async fn run(args: Args) -> Result<()> {
    setup_logging(args.verbose);
    debug!("Arguments: {:?}", args);

    let config = args.command.config();

    match args.command {
        Commands::Scan { path, hour, .. } => {
            let bulletin = load_bulletin(&path, &config.scanner)
                .with_context(|| format!("Failed to scan {}", path.display()))?;
            print_bulletin(&path, &bulletin);

            if let Some(hour) = hour {
                let view = bulletin.forecast_hour(hour).with_context(|| {
                    format!(
                        "Forecast hour {} not present ({} surface records)",
                        hour,
                        bulletin.surface.len()
                    )
                })?;
                print_forecast_hour(&view);
            }
        }
        Commands::Batch {
            input_dir, quiet, ..
        } => {
            let mut processor = BatchProcessor::new(input_dir.clone(), config)
                .with_context(|| format!("Invalid batch settings for {}", input_dir.display()))?;
            if !quiet {
                processor = processor.with_progress();
            }

            let report = processor
                .process()
                .await
                .with_context(|| format!("Batch scan of {} failed", input_dir.display()))?;
            report.print_summary();
        }
        Commands::Url {
            model,
            station,
            run,
        } => {
            println!("{}", bulletin_url(&model, &station, &run, &config));
        }
    }

    Ok(())
}

/// Set up structured logging on stderr
fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_bulletin(path: &Path, bulletin: &Bulletin) {
    println!(
        "{} {} {}",
        "Bulletin".bright_green().bold(),
        bulletin.model.to_uppercase().bright_white().bold(),
        bulletin.station.to_uppercase().bright_white().bold()
    );
    println!("  {} {}", "File:".bright_cyan(), path.display());
    println!("  {} {}", "Run time:".bright_cyan(), bulletin.run_time);
    println!(
        "  {} {} ({} levels)",
        "Profiles:".bright_cyan(),
        bulletin.profiles.len().to_string().bright_white(),
        bulletin.level_count()
    );
    println!(
        "  {} {}",
        "Surface records:".bright_cyan(),
        bulletin.surface.len().to_string().bright_white()
    );

    if let (Some(first), Some(last)) = (bulletin.surface.first(), bulletin.surface.last()) {
        println!(
            "  {} {} to {}",
            "Valid:".bright_cyan(),
            first.valid_time.format("%Y-%m-%d %H:%MZ"),
            last.valid_time.format("%Y-%m-%d %H:%MZ")
        );
    }
}

fn print_forecast_hour(view: &ForecastHour<'_>) {
    let surface = view.surface;

    println!(
        "\n{} {} ({})",
        "Forecast hour".bright_yellow().bold(),
        view.hour,
        surface.valid_time.format("%Y-%m-%d %H:%MZ")
    );
    println!(
        "  {} {}",
        "Station pressure:".bright_cyan(),
        surface.station_pressure
    );
    println!(
        "  {} {}",
        "2 m temperature:".bright_cyan(),
        surface.temperature_2m
    );
    println!(
        "  {} {}",
        "2 m dewpoint:".bright_cyan(),
        surface.dew_point_2m
    );
    println!(
        "  {} {} / {}",
        "10 m wind (u/v):".bright_cyan(),
        surface.u_wind,
        surface.v_wind
    );
    println!(
        "  {} {}",
        "1 h precipitation:".bright_cyan(),
        surface.precipitation
    );

    let Some(profile) = view.profile else {
        println!("  {}", "No aligned profile".bright_red());
        return;
    };

    println!(
        "\n  {:>8} {:>8} {:>8} {:>8} {:>8} {:>9}",
        "PRES", "TMPC", "DWPC", "DRCT", "SKNT", "HGHT"
    );
    for level in profile {
        println!(
            "  {:>8.1} {:>8.2} {:>8.2} {:>8.0} {:>8.1} {:>9.1}",
            level.pressure.value,
            level.temperature.value,
            level.dew_point.value,
            level.wind_direction.value,
            level.wind_speed.value,
            level.height.value
        );
    }
}
