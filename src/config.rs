//! Configuration management and validation.
//!
//! Provides configuration structures for the scanner's end-of-input
//! policy, batch processing parameters, and the retrieval URL bases.

use crate::constants::{DEFAULT_ARCHIVE_BASE_URL, DEFAULT_FILE_PATTERN, DEFAULT_LATEST_BASE_URL};
use crate::error::{BufkitError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Scanner behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Finalize the surface record still being assembled when input ends.
    ///
    /// When false, a surface record is only finalized by the next
    /// record-start line, so the last hour of every bulletin is dropped.
    pub flush_trailing_record: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            flush_trailing_record: true,
        }
    }
}

impl ScannerConfig {
    /// Keep the final surface record unflushed, matching older bulletin tooling
    pub fn legacy() -> Self {
        Self {
            flush_trailing_record: false,
        }
    }
}

/// Global configuration for bulletin processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufkitConfig {
    /// Scanner settings applied to every bulletin
    pub scanner: ScannerConfig,

    /// Number of bulletins scanned concurrently
    pub workers: usize,

    /// File name pattern used during discovery
    pub file_pattern: String,

    /// Descend into subdirectories during discovery
    pub recursive: bool,

    /// Base URL serving the latest run of each model
    pub latest_base_url: String,

    /// Base URL of the dated archive
    pub archive_base_url: String,
}

impl Default for BufkitConfig {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            workers: num_cpus::get(),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            recursive: true,
            latest_base_url: DEFAULT_LATEST_BASE_URL.to_string(),
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
        }
    }
}

impl BufkitConfig {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create configuration with custom discovery pattern
    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    /// Only scan the top level of the input directory
    pub fn without_recursion(mut self) -> Self {
        self.recursive = false;
        self
    }

    /// Replace scanner settings
    pub fn with_scanner(mut self, scanner: ScannerConfig) -> Self {
        self.scanner = scanner;
        self
    }

    /// Point retrieval at different servers
    pub fn with_base_urls(
        mut self,
        latest_base_url: impl Into<String>,
        archive_base_url: impl Into<String>,
    ) -> Self {
        self.latest_base_url = latest_base_url.into();
        self.archive_base_url = archive_base_url.into();
        self
    }

    /// Check settings before a batch run
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(BufkitError::configuration("workers must be at least 1"));
        }

        if let Err(e) = glob::Pattern::new(&self.file_pattern) {
            return Err(BufkitError::configuration(format!(
                "invalid file pattern {:?}: {}",
                self.file_pattern, e
            )));
        }

        for url in [&self.latest_base_url, &self.archive_base_url] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(BufkitError::configuration(format!(
                    "base URL must be http(s): {url}"
                )));
            }
        }

        debug!(
            "Configuration valid: {} workers, pattern {}",
            self.workers, self.file_pattern
        );
        Ok(())
    }
}
