//! Format constants for BUFKIT bulletins.
//!
//! Marker tokens, field counts, timestamp layouts and retrieval URL bases
//! used by the scanner and the source helpers.

// =============================================================================
// Section markers
// =============================================================================

/// Preamble token preceding the bulletin initialization time
pub const RUN_TIME_MARKER: &str = "TIME = ";

/// Column name that opens a vertical-profile section
pub const PROFILE_TRIGGER: &str = "TMPC";

/// Column name that opens the surface section
pub const SURFACE_TRIGGER: &str = "TD2M";

/// Station header token; ends the current profile
pub const STATION_HEADER: &str = "STN";

/// Second header line of the profile layout, never data
pub const CLOUD_FRACTION_HEADER: &str = "CFRL";

/// Character carried by the YYMMDD/HHMM token that opens each surface record
pub const SURFACE_RECORD_START: char = '/';

/// Field delimiter used when joining wrapped surface lines
pub const SURFACE_DELIMITER: char = ';';

// =============================================================================
// Record shapes
// =============================================================================

/// Tokens on the first physical line of a profile level
pub const PROFILE_FIRST_LINE_TOKENS: usize = 8;

/// Tokens on the second physical line of a profile level
pub const PROFILE_SECOND_LINE_TOKENS: usize = 2;

/// Profile level columns in source order
pub const PROFILE_COLUMNS: &[&str] = &[
    "PRES", "TMPC", "TMWC", "DWPC", "THTE", "DRCT", "SKNT", "OMEG", "CFRL", "HGHT",
];

/// Surface record columns in source order
pub const SURFACE_COLUMNS: &[&str] = &[
    "STN", "YYMMDD/HHMM", "PMSL", "PRES", "SKTC", "STC1", "SNFL", "WTNS", "P01M", "C01M",
    "STC2", "LCLD", "MCLD", "HCLD", "SNRA", "UWND", "VWND", "R01M", "BFGR", "T2MS", "Q2MS",
    "WXTS", "WXTP", "WXTZ", "WXTR", "USTM", "VSTM", "HLCY", "SLLH", "WSYM", "CDBP", "VSBK",
    "TD2M",
];

/// Number of fields a joined surface record must split into
pub const SURFACE_FIELD_COUNT: usize = 33;

/// Sentinel written by the post-processor for missing values
pub const MISSING_VALUE: f64 = -9999.0;

// =============================================================================
// Timestamps
// =============================================================================

/// Layout of run times and surface record timestamps (e.g. 230115/1200)
pub const BULLETIN_TIME_FORMAT: &str = "%y%m%d/%H%M";

/// Layout accepted for archived run selection on the command line
pub const RUN_ARGUMENT_FORMAT: &str = "%Y%m%d%H";

// =============================================================================
// Retrieval
// =============================================================================

/// Base URL serving the latest run of each model
pub const DEFAULT_LATEST_BASE_URL: &str = "http://www.meteo.psu.edu/bufkit/data";

/// Base URL of the dated bulletin archive
pub const DEFAULT_ARCHIVE_BASE_URL: &str = "https://mtarchive.geol.iastate.edu";

/// File pattern for bulletin discovery
pub const DEFAULT_FILE_PATTERN: &str = "*.buf";

/// Model whose latest-run file names carry a "3" suffix
pub const GFS_MODEL: &str = "GFS";
