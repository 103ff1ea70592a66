//! Command-line interface components.

pub mod commands;

use crate::config::{BufkitConfig, ScannerConfig};
use crate::constants::DEFAULT_FILE_PATTERN;
use crate::source::RunSelector;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bufkit")]
#[command(about = "Scan BUFKIT model-sounding bulletins into profile and surface records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Scan one bulletin file and summarize it
    Scan {
        /// Bulletin file named <model>_<station>.buf
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Show the surface record and aligned profile for this forecast hour
        #[arg(long)]
        hour: Option<usize>,

        /// Leave the final surface record unflushed
        #[arg(long)]
        legacy_trailing: bool,
    },

    /// Scan every bulletin under a directory
    Batch {
        /// Directory holding bulletin files
        #[arg(value_name = "DIR")]
        input_dir: PathBuf,

        /// Bulletins scanned concurrently (defaults to CPU count)
        #[arg(short, long)]
        workers: Option<usize>,

        /// File name pattern to match
        #[arg(long, default_value = DEFAULT_FILE_PATTERN)]
        pattern: String,

        /// Only scan the top level of the directory
        #[arg(long)]
        no_recursive: bool,

        /// Leave the final surface record of each bulletin unflushed
        #[arg(long)]
        legacy_trailing: bool,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the retrieval URL of a bulletin
    Url {
        /// Model name (e.g. NAM, GFS, RAP)
        #[arg(short, long)]
        model: String,

        /// Station identifier (e.g. KBUF)
        #[arg(short, long)]
        station: String,

        /// "latest" or an initialization hour as YYYYMMDDHH
        #[arg(short, long, default_value = "latest")]
        run: RunSelector,
    },
}

impl Commands {
    /// Build the processing configuration implied by the arguments
    pub fn config(&self) -> BufkitConfig {
        let mut config = BufkitConfig::default();

        match self {
            Commands::Scan {
                legacy_trailing, ..
            } => {
                if *legacy_trailing {
                    config = config.with_scanner(ScannerConfig::legacy());
                }
            }
            Commands::Batch {
                workers,
                pattern,
                no_recursive,
                legacy_trailing,
                ..
            } => {
                config = config.with_file_pattern(pattern.clone());
                if let Some(workers) = workers {
                    config = config.with_workers(*workers);
                }
                if *no_recursive {
                    config = config.without_recursion();
                }
                if *legacy_trailing {
                    config = config.with_scanner(ScannerConfig::legacy());
                }
            }
            Commands::Url { .. } => {}
        }

        config
    }
}
