//! Bulletin scanner.
//!
//! A single forward pass over the bulletin lines. Section detection is a
//! three-state machine whose transitions are guarded by column-name
//! substrings, because the format has no explicit grammar:
//!
//! ```text
//!              line contains TMPC              line contains TD2M
//!   Preamble ─────────────────────▶ InProfile ───────────────────▶ InSurface
//!      ▲                               │
//!      └──── blank line / STN line ────┘
//! ```
//!
//! Any state moves to `InProfile` or `InSurface` on the matching trigger;
//! the trigger line itself is a column header and never data. A header
//! that leaves a profile and also names the STN column closes that
//! profile, and no buffered level line survives a trigger. The profile
//! and surface accumulators live in [`profile`] and [`surface`]; all state
//! is owned by one [`BulletinScanner::scan`] call.

pub mod profile;
pub mod surface;

#[cfg(test)]
pub mod tests;

use self::{
    profile::{ProfileAccumulator, ProfileLine},
    surface::SurfaceAccumulator,
};

use crate::config::ScannerConfig;
use crate::constants::{PROFILE_TRIGGER, RUN_TIME_MARKER, STATION_HEADER, SURFACE_TRIGGER};
use crate::error::Result;
use crate::fields::parse_bulletin_time;
use crate::models::{Bulletin, RunTime};
use tracing::{debug, info};

/// Which tabular layout the scanner is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Outside any section (before the first header or between profiles)
    Preamble,
    InProfile,
    InSurface,
}

impl Section {
    /// Section opened by a header line, if the line is one
    fn triggered_by(line: &str) -> Option<Self> {
        if line.contains(SURFACE_TRIGGER) {
            Some(Section::InSurface)
        } else if line.contains(PROFILE_TRIGGER) {
            Some(Section::InProfile)
        } else {
            None
        }
    }
}

/// Converts bulletin text into a [`Bulletin`]
#[derive(Debug, Clone, Default)]
pub struct BulletinScanner {
    config: ScannerConfig,
}

impl BulletinScanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Scan newline-stripped lines of one bulletin.
    ///
    /// Either every record is well formed and a complete bulletin is
    /// returned, or the first malformed record fails the whole scan.
    pub fn scan<I, S>(&self, station: &str, model: &str, lines: I) -> Result<Bulletin>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = ScanState::new();

        for (index, line) in lines.into_iter().enumerate() {
            state.feed(line.as_ref(), index + 1)?;
        }

        let bulletin = state.finish(station, model, &self.config)?;

        info!(
            "Scanned {} {} bulletin (run {}): {} profiles, {} surface records",
            bulletin.model,
            bulletin.station,
            bulletin.run_time,
            bulletin.profiles.len(),
            bulletin.surface.len()
        );

        Ok(bulletin)
    }
}

/// Scan with the default configuration
pub fn scan_bulletin<I, S>(station: &str, model: &str, lines: I) -> Result<Bulletin>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    BulletinScanner::default().scan(station, model, lines)
}

/// Per-invocation scanner state
#[derive(Debug)]
struct ScanState {
    section: Section,
    run_time: RunTime,
    profiles: ProfileAccumulator,
    surface: SurfaceAccumulator,
}

impl ScanState {
    fn new() -> Self {
        Self {
            section: Section::Preamble,
            run_time: RunTime::Unknown,
            profiles: ProfileAccumulator::default(),
            surface: SurfaceAccumulator::default(),
        }
    }

    fn feed(&mut self, line: &str, number: usize) -> Result<()> {
        if !self.run_time.is_known() {
            self.capture_run_time(line, number)?;
        }

        if let Some(next) = Section::triggered_by(line) {
            // A header that carries the station column still ends the profile
            if self.section == Section::InProfile
                && next != Section::InProfile
                && line.contains(STATION_HEADER)
            {
                debug!("Line {}: profile section closed by header", number);
                self.profiles.close();
            }
            self.profiles.discard_pending();

            if next != self.section {
                debug!("Line {}: {:?} -> {:?}", number, self.section, next);
            }
            self.section = next;
            return Ok(());
        }

        match self.section {
            Section::Preamble => {}
            Section::InProfile => {
                if self.profiles.feed(line, number)? == ProfileLine::SectionEnd {
                    debug!("Line {}: profile section closed", number);
                    self.section = Section::Preamble;
                }
            }
            Section::InSurface => self.surface.feed(line, number)?,
        }

        Ok(())
    }

    fn capture_run_time(&mut self, line: &str, number: usize) -> Result<()> {
        if let Some(index) = line.find(RUN_TIME_MARKER) {
            let value = &line[index + RUN_TIME_MARKER.len()..];
            let time = parse_bulletin_time(value, number)?;
            debug!("Line {}: run time {}", number, time);
            self.run_time = RunTime::Known(time);
        }
        Ok(())
    }

    fn finish(self, station: &str, model: &str, config: &ScannerConfig) -> Result<Bulletin> {
        let surface = self.surface.finish(config.flush_trailing_record)?;
        let profiles = self.profiles.finish();

        Ok(Bulletin {
            station: station.to_string(),
            model: model.to_string(),
            run_time: self.run_time,
            profiles,
            surface,
        })
    }
}
