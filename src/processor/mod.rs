//! Batch processing of bulletin directories.
//!
//! Discovers bulletin files, scans them concurrently on the blocking pool,
//! and collects per-file outcomes. A failing bulletin is logged and
//! reported; it never stops the rest of the batch.

pub mod discovery;

#[cfg(test)]
pub mod tests;

use self::discovery::FileDiscovery;

use crate::config::BufkitConfig;
use crate::error::{BufkitError, Result};
use crate::models::{Bulletin, ProcessingStats};
use crate::source::load_bulletin;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info};

/// A bulletin that could not be scanned
#[derive(Debug)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: BufkitError,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub bulletins: Vec<(PathBuf, Bulletin)>,
    pub failures: Vec<BatchFailure>,
    pub stats: ProcessingStats,
}

impl BatchReport {
    /// Print a human-readable summary to stdout
    pub fn print_summary(&self) {
        println!("\n{}", "Batch Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            self.stats.processing_time_ms.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Bulletins scanned:".bright_cyan(),
            self.stats.files_processed.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Profiles:".bright_cyan(),
            self.stats.profiles.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Surface records:".bright_cyan(),
            self.stats.surface_records.to_string().bright_white().bold()
        );

        if self.stats.files_failed > 0 {
            println!(
                "  {} {} ({} retrieval)",
                "Bulletins failed:".bright_red(),
                self.stats.files_failed.to_string().bright_red().bold(),
                self.stats.retrieval_failures
            );
            for failure in &self.failures {
                println!(
                    "    {} {}",
                    failure.path.display().to_string().bright_black(),
                    failure.error
                );
            }
        }
    }
}

/// Batch processor for directories of bulletins
#[derive(Debug)]
pub struct BatchProcessor {
    config: BufkitConfig,
    file_discovery: FileDiscovery,
    show_progress: bool,
}

impl BatchProcessor {
    /// Create a new batch processor
    pub fn new(input_dir: PathBuf, config: BufkitConfig) -> Result<Self> {
        config.validate()?;
        let file_discovery = FileDiscovery::new(input_dir, &config)?;

        Ok(Self {
            config,
            file_discovery,
            show_progress: false,
        })
    }

    /// Draw a progress bar while scanning
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Scan every discovered bulletin
    pub async fn process(&self) -> Result<BatchReport> {
        let start_time = Instant::now();

        let files = self.file_discovery.discover()?;
        info!(
            "Scanning {} bulletins from {} with {} workers",
            files.len(),
            self.file_discovery.input_dir().display(),
            self.config.workers
        );

        let pb = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let scanner_config = self.config.scanner;
        let mut outcomes = stream::iter(files.iter().cloned())
            .map(|path| {
                let pb = pb.clone();
                async move {
                    if let Some(file_name) = path.file_name() {
                        pb.set_message(format!("Scanning: {}", file_name.to_string_lossy()));
                    }

                    let task_path = path.clone();
                    let result =
                        task::spawn_blocking(move || load_bulletin(&task_path, &scanner_config))
                            .await
                            .unwrap_or_else(|e| {
                                Err(BufkitError::TaskFailed {
                                    path: path.clone(),
                                    reason: e.to_string(),
                                })
                            });
                    pb.inc(1);

                    (path, result)
                }
            })
            .buffer_unordered(self.config.workers)
            .collect::<Vec<_>>()
            .await;

        pb.finish_with_message("Scan complete");
        outcomes.sort_by(|a, b| a.0.cmp(&b.0));

        let mut report = BatchReport {
            stats: ProcessingStats {
                files_discovered: files.len(),
                ..ProcessingStats::default()
            },
            ..BatchReport::default()
        };

        for (path, result) in outcomes {
            match result {
                Ok(bulletin) => {
                    debug!("Scanned {}", path.display());
                    report.stats.files_processed += 1;
                    report.stats.profiles += bulletin.profiles.len();
                    report.stats.surface_records += bulletin.surface.len();
                    report.bulletins.push((path, bulletin));
                }
                Err(e) => {
                    error!("Failed to scan {}: {:#}", path.display(), e);
                    report.stats.files_failed += 1;
                    if e.is_retrieval() {
                        report.stats.retrieval_failures += 1;
                    }
                    report.failures.push(BatchFailure { path, error: e });
                }
            }
        }

        report.stats.processing_time_ms = start_time.elapsed().as_millis();
        Ok(report)
    }
}
