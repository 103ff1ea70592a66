//! Vertical-profile accumulation.
//!
//! Each level is written across two physical lines: eight values
//! (PRES..OMEG) then two (CFRL HGHT). The accumulator buffers the first
//! line and only materializes a [`LeveledSample`] once its partner arrives.

use crate::constants::{
    CLOUD_FRACTION_HEADER, PROFILE_FIRST_LINE_TOKENS, PROFILE_SECOND_LINE_TOKENS, STATION_HEADER,
};
use crate::error::{BufkitError, Result};
use crate::models::{LeveledSample, Profile};
use tracing::{debug, warn};

/// Outcome of feeding one line to the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileLine {
    Continue,
    /// The line closed the current profile
    SectionEnd,
}

#[derive(Debug, Default)]
pub struct ProfileAccumulator {
    samples: Vec<LeveledSample>,
    pending: Vec<String>,
    pending_line: usize,
    completed: Vec<Profile>,
}

impl ProfileAccumulator {
    /// Feed one non-header line from inside a profile section
    pub fn feed(&mut self, line: &str, number: usize) -> Result<ProfileLine> {
        if line.trim().is_empty() || line.contains(STATION_HEADER) {
            self.close();
            return Ok(ProfileLine::SectionEnd);
        }

        if line.contains(CLOUD_FRACTION_HEADER) {
            return Ok(ProfileLine::Continue);
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() == PROFILE_SECOND_LINE_TOKENS {
            if self.pending.len() != PROFILE_FIRST_LINE_TOKENS {
                return Err(BufkitError::malformed(
                    number,
                    format!(
                        "level continuation follows a line with {} values, expected {}",
                        self.pending.len(),
                        PROFILE_FIRST_LINE_TOKENS
                    ),
                ));
            }

            let values: Vec<&str> = self
                .pending
                .iter()
                .map(String::as_str)
                .chain(tokens)
                .collect();
            self.samples.push(LeveledSample::from_tokens(&values, number)?);
            self.pending.clear();
        } else {
            if !self.pending.is_empty() {
                debug!("Line {}: replacing unpaired level line", self.pending_line);
            }
            self.pending = tokens.into_iter().map(str::to_string).collect();
            self.pending_line = number;
        }

        Ok(ProfileLine::Continue)
    }

    /// Close the current profile, even when it holds no levels
    pub fn close(&mut self) {
        self.discard_pending();
        self.completed
            .push(Profile::new(std::mem::take(&mut self.samples)));
    }

    /// Drop a buffered first level line so it cannot pair across sections
    pub fn discard_pending(&mut self) {
        if !self.pending.is_empty() {
            debug!("Line {}: dropping unpaired level line", self.pending_line);
            self.pending.clear();
        }
    }

    /// Profiles closed so far, in document order
    pub fn finish(self) -> Vec<Profile> {
        if !self.samples.is_empty() {
            warn!(
                "Input ended inside a profile; {} levels were not closed by a section end",
                self.samples.len()
            );
        }
        self.completed
    }
}
