//! Surface-record accumulation.
//!
//! A surface hour wraps over several physical lines. The line carrying
//! the YYMMDD/HHMM token starts a record; following lines are appended
//! until the next start. Columns are joined with `;` so field-width
//! differences between lines cannot shift values.

use crate::constants::{SURFACE_DELIMITER, SURFACE_RECORD_START};
use crate::error::Result;
use crate::fields::delimit_surface_line;
use crate::models::SurfaceRecord;
use tracing::debug;

#[derive(Debug, Default)]
pub struct SurfaceAccumulator {
    joined: String,
    started: bool,
    start_line: usize,
    records: Vec<SurfaceRecord>,
}

impl SurfaceAccumulator {
    /// Feed one non-header line from inside the surface section
    pub fn feed(&mut self, line: &str, number: usize) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }

        let delimited = delimit_surface_line(line);

        if line.contains(SURFACE_RECORD_START) {
            if self.started {
                self.finalize()?;
            }
            self.joined = delimited;
            self.started = true;
            self.start_line = number;
        } else if self.started {
            self.joined.push_str(&delimited);
        } else {
            debug!(
                "Line {}: ignoring surface line before the first record",
                number
            );
        }

        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let joined = std::mem::take(&mut self.joined);
        let body = joined.strip_suffix(SURFACE_DELIMITER).unwrap_or(&joined);
        let record = SurfaceRecord::from_joined(body, self.start_line)?;
        self.records.push(record);
        Ok(())
    }

    /// Records finalized during the scan, plus the trailing one when
    /// `flush_trailing` is set
    pub fn finish(mut self, flush_trailing: bool) -> Result<Vec<SurfaceRecord>> {
        if self.started {
            if flush_trailing {
                self.finalize()?;
            } else {
                debug!(
                    "Leaving surface record started at line {} unflushed",
                    self.start_line
                );
            }
        }
        Ok(self.records)
    }
}
