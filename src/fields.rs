//! Token-level parsers shared by record construction.

use crate::constants::BULLETIN_TIME_FORMAT;
use crate::error::{BufkitError, Result};
use crate::models::{Measurement, Unit};
use chrono::NaiveDateTime;

/// Parse a numeric token and tag it with its unit
pub fn parse_measurement(
    token: &str,
    unit: Unit,
    column: &str,
    line: usize,
) -> Result<Measurement> {
    let value = token.trim().parse::<f64>().map_err(|_| {
        BufkitError::malformed(line, format!("{column} is not numeric: {token:?}"))
    })?;

    Ok(Measurement::new(value, unit))
}

/// Parse a YYMMDD/HHMM timestamp token
pub fn parse_bulletin_time(token: &str, line: usize) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(token.trim(), BULLETIN_TIME_FORMAT).map_err(|e| {
        BufkitError::malformed(line, format!("invalid timestamp {token:?}: {e}"))
    })
}

/// Collapse whitespace runs and delimit columns with semicolons.
///
/// Each line contributes a trailing delimiter so that wrapped physical
/// lines always split on a field boundary once joined.
pub fn delimit_surface_line(line: &str) -> String {
    let mut delimited = line.split_whitespace().collect::<Vec<_>>().join(";");
    delimited.push(';');
    delimited
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_measurement() {
        let m = parse_measurement("985.60", Unit::HectoPascal, "PRES", 1).unwrap();
        assert_eq!(m.value, 985.6);
        assert_eq!(m.unit, Unit::HectoPascal);

        let m = parse_measurement(" -3.84 ", Unit::Celsius, "TMPC", 1).unwrap();
        assert_eq!(m.value, -3.84);
    }

    #[test]
    fn test_parse_measurement_rejects_text() {
        let err = parse_measurement("abc", Unit::Knots, "SKNT", 7).unwrap_err();
        match err {
            BufkitError::MalformedRecord { line, reason } => {
                assert_eq!(line, 7);
                assert!(reason.contains("SKNT"));
            }
            other => panic!("Expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_bulletin_time() {
        let t = parse_bulletin_time("230115/1200", 1).unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2023, 1, 15));
        assert_eq!((t.hour(), t.minute()), (12, 0));

        assert!(parse_bulletin_time("2301151200", 1).is_err());
        assert!(parse_bulletin_time("231315/1200", 1).is_err());
    }

    #[test]
    fn test_delimit_surface_line() {
        assert_eq!(
            delimit_surface_line("725280 230115/1200 1013.20"),
            "725280;230115/1200;1013.20;"
        );
        assert_eq!(
            delimit_surface_line("0.00  0.00   275.34"),
            "0.00;0.00;275.34;"
        );
        assert_eq!(delimit_surface_line("  -1.20\t4.00 "), "-1.20;4.00;");
    }
}
