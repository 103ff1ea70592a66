//! Bulletin sources.
//!
//! Reads bulletin files into cleaned lines, derives model and station from
//! BUFKIT file names, and builds the dated retrieval URLs used by the
//! public BUFKIT servers. No network access happens here; callers fetch.

use crate::config::{BufkitConfig, ScannerConfig};
use crate::constants::{GFS_MODEL, RUN_ARGUMENT_FORMAT};
use crate::error::{BufkitError, Result};
use crate::models::Bulletin;
use crate::scanner::BulletinScanner;
use chrono::NaiveDateTime;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

/// Byte-string quoting left behind by some download tools: b'...\r\n'
static BYTE_STRING_FRAMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^b'(.*?)(?:\\r\\n|\\n)?'$").expect("framing pattern is valid")
});

/// Strip transport framing from one raw line
pub fn clean_line(raw: &str) -> String {
    let line = raw.trim_end_matches(['\r', '\n']);
    match BYTE_STRING_FRAMING.captures(line) {
        Some(caps) => caps[1].to_string(),
        None => line.to_string(),
    }
}

/// Read a bulletin file into cleaned lines
pub fn read_bulletin(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path)
        .map_err(|e| BufkitError::retrieval(path.display().to_string(), e.to_string()))?;

    let text = String::from_utf8(bytes).map_err(|e| {
        BufkitError::retrieval(path.display().to_string(), format!("not valid UTF-8: {e}"))
    })?;

    let lines: Vec<String> = text.lines().map(clean_line).collect();
    debug!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Read and scan one bulletin file, naming it from its file name
pub fn load_bulletin(path: &Path, config: &ScannerConfig) -> Result<Bulletin> {
    let name = BulletinName::from_path(path)?;
    let lines = read_bulletin(path)?;
    BulletinScanner::new(*config).scan(&name.station, &name.model, lines)
}

/// Model and station encoded in a `<model>_<station>.buf` file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletinName {
    pub model: String,
    pub station: String,
}

impl BulletinName {
    pub fn from_path(path: &Path) -> Result<Self> {
        let invalid = || BufkitError::InvalidBulletinName {
            path: path.to_path_buf(),
        };

        let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;
        let (model, station) = stem.split_once('_').ok_or_else(invalid)?;
        if model.is_empty() || station.is_empty() {
            return Err(invalid());
        }

        let model = model.to_lowercase();
        // Latest-run GFS files are published as gfs3_<station>
        let model = match model.strip_suffix('3') {
            Some(base) if base.eq_ignore_ascii_case(GFS_MODEL) => base.to_string(),
            _ => model,
        };

        Ok(Self {
            model,
            station: station.to_lowercase(),
        })
    }

    /// File name the servers publish this bulletin under
    pub fn file_name(&self, run: &RunSelector) -> String {
        let model = self.model.to_lowercase();
        match run {
            RunSelector::Latest if model.eq_ignore_ascii_case(GFS_MODEL) => {
                format!("{}3_{}.buf", model, self.station.to_lowercase())
            }
            _ => format!("{}_{}.buf", model, self.station.to_lowercase()),
        }
    }
}

/// Which model run to retrieve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSelector {
    Latest,
    Archived(NaiveDateTime),
}

impl FromStr for RunSelector {
    type Err = BufkitError;

    /// Accepts "latest" or an initialization hour as YYYYMMDDHH
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(RunSelector::Latest);
        }

        NaiveDateTime::parse_from_str(&format!("{s}00"), &format!("{RUN_ARGUMENT_FORMAT}%M"))
            .map(RunSelector::Archived)
            .map_err(|e| BufkitError::configuration(format!("invalid run {s:?}: {e}")))
    }
}

impl fmt::Display for RunSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunSelector::Latest => f.write_str("latest"),
            RunSelector::Archived(time) => write!(f, "{}", time.format(RUN_ARGUMENT_FORMAT)),
        }
    }
}

/// Retrieval URL for a model/station/run
pub fn bulletin_url(
    model: &str,
    station: &str,
    run: &RunSelector,
    config: &BufkitConfig,
) -> String {
    let name = BulletinName {
        model: model.to_lowercase(),
        station: station.to_lowercase(),
    };
    let file_name = name.file_name(run);

    match run {
        RunSelector::Latest => format!(
            "{}/{}/latest/{}",
            config.latest_base_url.trim_end_matches('/'),
            model.to_uppercase(),
            file_name
        ),
        RunSelector::Archived(time) => format!(
            "{}/{}/bufkit/{}/{}/{}",
            config.archive_base_url.trim_end_matches('/'),
            time.format("%Y/%m/%d"),
            time.format("%H"),
            name.model,
            file_name
        ),
    }
}
