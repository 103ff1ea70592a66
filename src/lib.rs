//! BUFKIT Bulletin Scanner
//!
//! Converts BUFKIT model-sounding bulletins (the text product of forecast
//! model post-processors) into structured, unit-tagged records.
//!
//! This library provides tools for:
//! - Scanning bulletin text into vertical profiles, surface records and
//!   the bulletin run time, in one forward pass
//! - Tagging every value with its physical unit
//! - Reading bulletin files and building their retrieval URLs
//! - Scanning whole directories of bulletins concurrently, reporting
//!   failures per bulletin

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod fields;
pub mod models;
pub mod processor;
pub mod scanner;
pub mod source;

// Re-export commonly used types
pub use config::{BufkitConfig, ScannerConfig};
pub use error::{BufkitError, Result};
pub use models::{Bulletin, LeveledSample, Measurement, Profile, RunTime, SurfaceRecord, Unit};
pub use scanner::{BulletinScanner, scan_bulletin};
