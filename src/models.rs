//! Core data structures for scanned bulletins.
//!
//! Defines unit-tagged measurements, profile levels, surface records,
//! the bulletin aggregate and batch processing statistics.

use crate::constants::{
    MISSING_VALUE, PROFILE_COLUMNS, SURFACE_COLUMNS, SURFACE_DELIMITER, SURFACE_FIELD_COUNT,
};
use crate::error::{BufkitError, Result};
use crate::fields::{parse_bulletin_time, parse_measurement};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical unit attached to a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    HectoPascal,
    Celsius,
    Kelvin,
    Degrees,
    Knots,
    PascalPerSecond,
    Percent,
    Meters,
    Kilometers,
    Millimeters,
    KilogramsPerSquareMeter,
    MetersPerSecond,
    SquareMetersPerSecondSquared,
    Dimensionless,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::HectoPascal => "hPa",
            Unit::Celsius => "°C",
            Unit::Kelvin => "K",
            Unit::Degrees => "deg",
            Unit::Knots => "kt",
            Unit::PascalPerSecond => "Pa/s",
            Unit::Percent => "%",
            Unit::Meters => "m",
            Unit::Kilometers => "km",
            Unit::Millimeters => "mm",
            Unit::KilogramsPerSquareMeter => "kg/m²",
            Unit::MetersPerSecond => "m/s",
            Unit::SquareMetersPerSecondSquared => "m²/s²",
            Unit::Dimensionless => "",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A numeric magnitude tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: Unit,
}

impl Measurement {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// True when the post-processor wrote its -9999 sentinel
    pub fn is_missing(&self) -> bool {
        self.value == MISSING_VALUE
    }

    /// The value, or None for the missing sentinel
    pub fn present(&self) -> Option<f64> {
        (!self.is_missing()).then_some(self.value)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Unit::Dimensionless => write!(f, "{:.2}", self.value),
            unit => write!(f, "{:.2} {}", self.value, unit),
        }
    }
}

/// Bulletin initialization time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunTime {
    Known(NaiveDateTime),
    /// No run-time marker was present in the text
    #[default]
    Unknown,
}

impl RunTime {
    pub fn is_known(&self) -> bool {
        matches!(self, RunTime::Known(_))
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            RunTime::Known(time) => Some(*time),
            RunTime::Unknown => None,
        }
    }
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunTime::Known(time) => write!(f, "{}", time.format("%Y-%m-%d %H:%MZ")),
            RunTime::Unknown => f.write_str("unknown"),
        }
    }
}

/// Units of the ten profile columns, in source order
const PROFILE_UNITS: [Unit; 10] = [
    Unit::HectoPascal,
    Unit::Celsius,
    Unit::Celsius,
    Unit::Celsius,
    Unit::Kelvin,
    Unit::Degrees,
    Unit::Knots,
    Unit::PascalPerSecond,
    Unit::Percent,
    Unit::Meters,
];

/// One level of a vertical profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeveledSample {
    pub pressure: Measurement,
    pub temperature: Measurement,
    pub wet_bulb: Measurement,
    pub dew_point: Measurement,
    pub theta_e: Measurement,
    pub wind_direction: Measurement,
    pub wind_speed: Measurement,
    pub omega: Measurement,
    pub cloud_fraction: Measurement,
    pub height: Measurement,
}

impl LeveledSample {
    /// Build a level from its ten tokens (eight from the first line, two
    /// from the second).
    pub fn from_tokens(tokens: &[&str], line: usize) -> Result<Self> {
        if tokens.len() != PROFILE_UNITS.len() {
            return Err(BufkitError::malformed(
                line,
                format!(
                    "profile level needs {} values, found {}",
                    PROFILE_UNITS.len(),
                    tokens.len()
                ),
            ));
        }

        let m = |i: usize| parse_measurement(tokens[i], PROFILE_UNITS[i], PROFILE_COLUMNS[i], line);

        Ok(Self {
            pressure: m(0)?,
            temperature: m(1)?,
            wet_bulb: m(2)?,
            dew_point: m(3)?,
            theta_e: m(4)?,
            wind_direction: m(5)?,
            wind_speed: m(6)?,
            omega: m(7)?,
            cloud_fraction: m(8)?,
            height: m(9)?,
        })
    }

    /// All ten fields in source column order
    pub fn fields(&self) -> [Measurement; 10] {
        [
            self.pressure,
            self.temperature,
            self.wet_bulb,
            self.dew_point,
            self.theta_e,
            self.wind_direction,
            self.wind_speed,
            self.omega,
            self.cloud_fraction,
            self.height,
        ]
    }
}

/// One forecast-hour vertical sounding, lowest level first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    samples: Vec<LeveledSample>,
}

impl Profile {
    pub fn new(samples: Vec<LeveledSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[LeveledSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Lowest level in the sounding
    pub fn surface_level(&self) -> Option<&LeveledSample> {
        self.samples.first()
    }
}

impl<'a> IntoIterator for &'a Profile {
    type Item = &'a LeveledSample;
    type IntoIter = std::slice::Iter<'a, LeveledSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Units of the surface columns after STN and YYMMDD/HHMM
const SURFACE_UNITS: [Unit; SURFACE_FIELD_COUNT - 2] = [
    Unit::HectoPascal,             // PMSL
    Unit::HectoPascal,             // PRES
    Unit::Celsius,                 // SKTC
    Unit::Kelvin,                  // STC1
    Unit::KilogramsPerSquareMeter, // SNFL
    Unit::Percent,                 // WTNS
    Unit::Millimeters,             // P01M
    Unit::Millimeters,             // C01M
    Unit::Kelvin,                  // STC2
    Unit::Percent,                 // LCLD
    Unit::Percent,                 // MCLD
    Unit::Percent,                 // HCLD
    Unit::Percent,                 // SNRA
    Unit::MetersPerSecond,         // UWND
    Unit::MetersPerSecond,         // VWND
    Unit::Millimeters,             // R01M
    Unit::Millimeters,             // BFGR
    Unit::Celsius,                 // T2MS
    Unit::Dimensionless,           // Q2MS
    Unit::Dimensionless,           // WXTS
    Unit::Dimensionless,           // WXTP
    Unit::Dimensionless,           // WXTZ
    Unit::Dimensionless,           // WXTR
    Unit::MetersPerSecond,         // USTM
    Unit::MetersPerSecond,         // VSTM
    Unit::SquareMetersPerSecondSquared, // HLCY
    Unit::Millimeters,             // SLLH
    Unit::Dimensionless,           // WSYM
    Unit::HectoPascal,             // CDBP
    Unit::Kilometers,              // VSBK
    Unit::Celsius,                 // TD2M
];

/// One forecast-hour surface observation.
///
/// Only built from its joined text, so the typed values and the raw
/// fields always agree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceRecord {
    pub station: String,
    pub valid_time: NaiveDateTime,
    pub sea_level_pressure: Measurement,
    pub station_pressure: Measurement,
    pub skin_temperature: Measurement,
    pub soil_temperature_layer1: Measurement,
    pub snowfall: Measurement,
    pub soil_moisture: Measurement,
    pub precipitation: Measurement,
    pub convective_precipitation: Measurement,
    pub soil_temperature_layer2: Measurement,
    pub low_cloud: Measurement,
    pub middle_cloud: Measurement,
    pub high_cloud: Measurement,
    pub snow_ratio: Measurement,
    pub u_wind: Measurement,
    pub v_wind: Measurement,
    pub surface_runoff: Measurement,
    pub baseflow_runoff: Measurement,
    pub temperature_2m: Measurement,
    pub specific_humidity_2m: Measurement,
    pub snow_type: Measurement,
    pub ice_pellet_type: Measurement,
    pub freezing_rain_type: Measurement,
    pub rain_type: Measurement,
    pub storm_motion_u: Measurement,
    pub storm_motion_v: Measurement,
    pub helicity: Measurement,
    pub evaporation: Measurement,
    pub weather_symbol: Measurement,
    pub cloud_base_pressure: Measurement,
    pub visibility: Measurement,
    pub dew_point_2m: Measurement,
    fields: Vec<String>,
}

impl SurfaceRecord {
    /// Build a record from its semicolon-joined form.
    ///
    /// The string must split into exactly 33 fields; a trailing line
    /// terminator has to be removed by the caller.
    pub fn from_joined(joined: &str, line: usize) -> Result<Self> {
        let fields: Vec<&str> = joined.split(SURFACE_DELIMITER).collect();
        if fields.len() != SURFACE_FIELD_COUNT {
            return Err(BufkitError::malformed(
                line,
                format!(
                    "surface record needs {} fields, found {}",
                    SURFACE_FIELD_COUNT,
                    fields.len()
                ),
            ));
        }

        let station = fields[0].trim();
        if station.is_empty() {
            return Err(BufkitError::malformed(line, "surface record has no station id"));
        }
        let valid_time = parse_bulletin_time(fields[1], line)?;

        let m = |i: usize| {
            parse_measurement(fields[i], SURFACE_UNITS[i - 2], SURFACE_COLUMNS[i], line)
        };

        Ok(Self {
            station: station.to_string(),
            valid_time,
            sea_level_pressure: m(2)?,
            station_pressure: m(3)?,
            skin_temperature: m(4)?,
            soil_temperature_layer1: m(5)?,
            snowfall: m(6)?,
            soil_moisture: m(7)?,
            precipitation: m(8)?,
            convective_precipitation: m(9)?,
            soil_temperature_layer2: m(10)?,
            low_cloud: m(11)?,
            middle_cloud: m(12)?,
            high_cloud: m(13)?,
            snow_ratio: m(14)?,
            u_wind: m(15)?,
            v_wind: m(16)?,
            surface_runoff: m(17)?,
            baseflow_runoff: m(18)?,
            temperature_2m: m(19)?,
            specific_humidity_2m: m(20)?,
            snow_type: m(21)?,
            ice_pellet_type: m(22)?,
            freezing_rain_type: m(23)?,
            rain_type: m(24)?,
            storm_motion_u: m(25)?,
            storm_motion_v: m(26)?,
            helicity: m(27)?,
            evaporation: m(28)?,
            weather_symbol: m(29)?,
            cloud_base_pressure: m(30)?,
            visibility: m(31)?,
            dew_point_2m: m(32)?,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
    }

    /// Source fields in column order, as they appeared in the bulletin
    pub fn raw_fields(&self) -> &[String] {
        &self.fields
    }

    /// Rejoin the source fields with the record delimiter
    pub fn to_joined(&self) -> String {
        let mut buf = [0; 4];
        let delimiter: &str = SURFACE_DELIMITER.encode_utf8(&mut buf);
        self.fields.join(delimiter)
    }
}

/// One scanned bulletin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bulletin {
    pub station: String,
    pub model: String,
    pub run_time: RunTime,
    pub profiles: Vec<Profile>,
    pub surface: Vec<SurfaceRecord>,
}

impl Bulletin {
    /// Pair surface record `hour` with the profile closed after it.
    ///
    /// The profile sequence starts with the section closed by the
    /// parameter preamble, so hour h sits at profile index h + 1.
    pub fn forecast_hour(&self, hour: usize) -> Option<ForecastHour<'_>> {
        let surface = self.surface.get(hour)?;
        Some(ForecastHour {
            hour,
            surface,
            profile: self.profiles.get(hour + 1),
        })
    }

    /// Every surface hour with its aligned profile
    pub fn forecast_hours(&self) -> impl Iterator<Item = ForecastHour<'_>> {
        (0..self.surface.len()).filter_map(|hour| self.forecast_hour(hour))
    }

    /// Total levels across all profiles
    pub fn level_count(&self) -> usize {
        self.profiles.iter().map(Profile::len).sum()
    }
}

/// Borrowed view of one forecast hour
#[derive(Debug, Clone, Copy)]
pub struct ForecastHour<'a> {
    pub hour: usize,
    pub surface: &'a SurfaceRecord,
    pub profile: Option<&'a Profile>,
}

/// Batch processing statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingStats {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub retrieval_failures: usize,
    pub profiles: usize,
    pub surface_records: usize,
    pub processing_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const JOINED: &str = "725280;230115/1200;1013.20;985.60;-3.45;271.29;0.00;100.00;\
0.00;0.00;275.34;0.00;0.00;0.00;0.00;2.83;\
3.64;0.00;0.00;-3.62;0.0027;0.00;0.00;0.00;\
0.00;6.89;4.43;48.99;0.01;2.00;-9999.00;24.14;\
-6.14";

    #[test]
    fn test_leveled_sample_fields_follow_token_order() {
        let tokens = [
            "985.60", "-3.84", "-4.60", "-6.40", "272.69", "250.56", "12.46", "-0.40", "0.00",
            "227.53",
        ];
        let sample = LeveledSample::from_tokens(&tokens, 4).unwrap();

        for (field, (token, unit)) in sample.fields().iter().zip(tokens.iter().zip(PROFILE_UNITS)) {
            assert_eq!(field.value, token.parse::<f64>().unwrap());
            assert_eq!(field.unit, unit);
        }
        assert_eq!(sample.pressure.unit, Unit::HectoPascal);
        assert_eq!(sample.theta_e.unit, Unit::Kelvin);
        assert_eq!(sample.omega.unit, Unit::PascalPerSecond);
        assert_eq!(sample.height.value, 227.53);
    }

    #[test]
    fn test_leveled_sample_rejects_wrong_token_count() {
        let err = LeveledSample::from_tokens(&["1", "2", "3"], 9).unwrap_err();
        assert!(matches!(err, BufkitError::MalformedRecord { line: 9, .. }));
    }

    #[test]
    fn test_surface_record_round_trips_joined_string() {
        let record = SurfaceRecord::from_joined(JOINED, 1).unwrap();
        assert_eq!(record.raw_fields().len(), SURFACE_FIELD_COUNT);
        assert_eq!(record.to_joined(), JOINED);
    }

    #[test]
    fn test_surface_record_rebuilt_from_joined_form_is_identical() {
        let record = SurfaceRecord::from_joined(JOINED, 1).unwrap();
        let rebuilt = SurfaceRecord::from_joined(&record.to_joined(), 1).unwrap();

        assert_eq!(rebuilt, record);
        assert_eq!(rebuilt.dew_point_2m.value, -6.14);
        assert_eq!(rebuilt.raw_fields()[SURFACE_FIELD_COUNT - 1], "-6.14");
    }

    #[test]
    fn test_surface_record_typed_fields() {
        let record = SurfaceRecord::from_joined(JOINED, 1).unwrap();
        assert_eq!(record.station, "725280");
        assert_eq!(
            record.valid_time,
            NaiveDate::from_ymd_opt(2023, 1, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
        assert_eq!(record.sea_level_pressure.value, 1013.2);
        assert_eq!(record.station_pressure.unit, Unit::HectoPascal);
        assert_eq!(record.snowfall.unit, Unit::KilogramsPerSquareMeter);
        assert_eq!(record.helicity.value, 48.99);
        assert_eq!(record.helicity.unit, Unit::SquareMetersPerSecondSquared);
        assert_eq!(record.visibility.unit, Unit::Kilometers);
        assert_eq!(record.dew_point_2m.value, -6.14);
        assert!(record.cloud_base_pressure.is_missing());
        assert_eq!(record.cloud_base_pressure.present(), None);
    }

    #[test]
    fn test_surface_record_rejects_wrong_field_counts() {
        let short = JOINED.rsplit_once(';').unwrap().0;
        let long = format!("{JOINED};1.00");

        for joined in [short, long.as_str()] {
            match SurfaceRecord::from_joined(joined, 12).unwrap_err() {
                BufkitError::MalformedRecord { line, reason } => {
                    assert_eq!(line, 12);
                    assert!(reason.contains("33"));
                }
                other => panic!("Expected MalformedRecord, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_surface_record_rejects_bad_timestamp() {
        let joined = JOINED.replace("230115/1200", "230115-1200");
        assert!(SurfaceRecord::from_joined(&joined, 1).is_err());
    }

    #[test]
    fn test_run_time_display() {
        let time = NaiveDate::from_ymd_opt(2023, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(RunTime::Known(time).to_string(), "2023-01-15 12:00Z");
        assert_eq!(RunTime::Unknown.to_string(), "unknown");
        assert_eq!(RunTime::default(), RunTime::Unknown);
    }

    #[test]
    fn test_forecast_hour_alignment() {
        let record = SurfaceRecord::from_joined(JOINED, 1).unwrap();
        let bulletin = Bulletin {
            station: "kbuf".to_string(),
            model: "nam".to_string(),
            run_time: RunTime::Unknown,
            profiles: vec![Profile::default(), Profile::new(Vec::new())],
            surface: vec![record.clone(), record],
        };

        let first = bulletin.forecast_hour(0).unwrap();
        assert_eq!(first.hour, 0);
        assert!(first.profile.is_some());

        let second = bulletin.forecast_hour(1).unwrap();
        assert!(second.profile.is_none());
        assert!(bulletin.forecast_hour(2).is_none());
        assert_eq!(bulletin.forecast_hours().count(), 2);
    }

    #[test]
    fn test_measurement_display() {
        assert_eq!(
            Measurement::new(985.6, Unit::HectoPascal).to_string(),
            "985.60 hPa"
        );
        assert_eq!(
            Measurement::new(2.0, Unit::Dimensionless).to_string(),
            "2.00"
        );
    }
}
