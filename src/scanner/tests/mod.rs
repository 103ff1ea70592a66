//! Tests for the bulletin scanner
//!
//! Covers the profile and surface accumulators in isolation and the
//! state machine end to end against a realistic NAM bulletin.


/// Two-hour NAM bulletin for Buffalo
pub const NAM_KBUF: &str = include_str!("../../../tests/data/nam_kbuf.buf");

/// First physical line of a surface hour
pub fn surface_start(station: &str, stamp: &str) -> String {
    format!("{station} {stamp} 1013.20 985.60 -3.45 271.29 0.00 100.00")
}

/// Continuation lines completing a 33-field surface hour
pub const SURFACE_CONTINUATION: [&str; 4] = [
    "0.00 0.00 275.34 0.00 0.00 0.00 0.00 2.83",
    "3.64 0.00 0.00 -3.62 0.0027 0.00 0.00 0.00",
    "0.00 6.89 4.43 48.99 0.01 2.00 -9999.00 24.14",
    "-6.14",
];
