//! Integration tests for the bulletin scanner with a realistic NAM bulletin
//!
//! The fixture under tests/data is a two-hour NAM bulletin for Buffalo (KBUF)
//! in the layout published by the public BUFKIT servers.

use bufkit_scanner::processor::BatchProcessor;
use bufkit_scanner::source::{bulletin_url, load_bulletin, read_bulletin};
use bufkit_scanner::{BufkitConfig, BufkitError, RunTime, ScannerConfig, Unit, scan_bulletin};
use chrono::{NaiveDate, Timelike};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FIXTURE: &str = "tests/data/nam_kbuf.buf";

fn fixture_path() -> &'static Path {
    Path::new(FIXTURE)
}

#[test]
fn test_load_fixture_bulletin() {
    let bulletin = load_bulletin(fixture_path(), &ScannerConfig::default()).unwrap();

    assert_eq!(bulletin.model, "nam");
    assert_eq!(bulletin.station, "kbuf");
    let run = NaiveDate::from_ymd_opt(2023, 1, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    assert_eq!(bulletin.run_time, RunTime::Known(run));
    assert_eq!(bulletin.run_time.as_datetime(), Some(run));
    assert_eq!(bulletin.run_time.to_string(), "2023-01-15 12:00Z");

    let sizes: Vec<usize> = bulletin.profiles.iter().map(|p| p.len()).collect();
    assert_eq!(sizes, vec![0, 3, 2]);
    assert_eq!(bulletin.level_count(), 5);
    assert_eq!(bulletin.surface.len(), 2);
}

#[test]
fn test_forecast_hours_pair_surface_with_next_profile() {
    let bulletin = load_bulletin(fixture_path(), &ScannerConfig::default()).unwrap();
    let hours: Vec<_> = bulletin.forecast_hours().collect();
    assert_eq!(hours.len(), 2);

    let first = &hours[0];
    assert_eq!(first.surface.valid_time.hour(), 12);
    let profile = first.profile.unwrap();
    assert_eq!(profile.len(), 3);
    let lowest = profile.surface_level().unwrap();
    assert_eq!(lowest.pressure.value, 985.60);
    assert_eq!(lowest.pressure.unit, Unit::HectoPascal);
    assert_eq!(first.surface.station_pressure.value, 985.60);

    let second = &hours[1];
    assert_eq!(second.surface.valid_time.hour(), 13);
    assert_eq!(second.profile.unwrap().len(), 2);
    assert_eq!(second.surface.weather_symbol.value, 71.0);
    assert_eq!(second.surface.cloud_base_pressure.value, 870.20);
    assert_eq!(second.surface.dew_point_2m.value, -6.30);
}

#[test]
fn test_missing_sentinel_is_preserved() {
    let bulletin = load_bulletin(fixture_path(), &ScannerConfig::default()).unwrap();
    let first = &bulletin.surface[0];

    assert!(first.cloud_base_pressure.is_missing());
    assert_eq!(first.cloud_base_pressure.present(), None);
    assert_eq!(first.visibility.present(), Some(24.14));
}

#[test]
fn test_joined_form_rebuilds_identical_record() {
    let lines = read_bulletin(fixture_path()).unwrap();
    let bulletin = scan_bulletin("kbuf", "nam", &lines).unwrap();

    for record in &bulletin.surface {
        let joined = record.to_joined();
        assert_eq!(joined.split(';').count(), 33);
        assert!(joined.starts_with("725280;230115/"));
    }
}

#[test]
fn test_legacy_policy_drops_final_record() {
    let bulletin = load_bulletin(fixture_path(), &ScannerConfig::legacy()).unwrap();

    assert_eq!(bulletin.surface.len(), 1);
    assert_eq!(bulletin.profiles.len(), 3);
    assert_eq!(bulletin.forecast_hours().count(), 1);
}

#[test]
fn test_malformed_level_reports_line() {
    let text = fs::read_to_string(fixture_path()).unwrap();
    // Drop OMEG from the first level; its partner is line 16
    let broken = text.replacen("12.46 -0.40", "12.46", 1);

    let lines: Vec<&str> = broken.lines().collect();
    match scan_bulletin("kbuf", "nam", lines).unwrap_err() {
        BufkitError::MalformedRecord { line, .. } => assert_eq!(line, 16),
        other => panic!("Expected MalformedRecord, got {other:?}"),
    }
}

#[tokio::test]
async fn test_batch_over_run_directory() {
    let temp_dir = TempDir::new().unwrap();
    let run_dir = temp_dir.path().join("2023/01/15/bufkit/12/nam");
    fs::create_dir_all(&run_dir).unwrap();
    fs::copy(fixture_path(), run_dir.join("nam_kbuf.buf")).unwrap();
    fs::copy(fixture_path(), run_dir.join("nam_kroc.buf")).unwrap();
    fs::write(run_dir.join("notes.txt"), "not a bulletin").unwrap();

    let report = BatchProcessor::new(temp_dir.path().to_path_buf(), BufkitConfig::default())
        .unwrap()
        .process()
        .await
        .unwrap();

    assert_eq!(report.stats.files_discovered, 2);
    assert_eq!(report.stats.files_processed, 2);
    assert!(report.failures.is_empty());

    let stations: Vec<&str> = report
        .bulletins
        .iter()
        .map(|(_, b)| b.station.as_str())
        .collect();
    assert_eq!(stations, vec!["kbuf", "kroc"]);
}

#[test]
fn test_archive_url_matches_run_directory_layout() {
    let config = BufkitConfig::default();
    let url = bulletin_url("nam", "kbuf", &"2023011512".parse().unwrap(), &config);

    assert_eq!(
        url,
        "https://mtarchive.geol.iastate.edu/2023/01/15/bufkit/12/nam/nam_kbuf.buf"
    );
}
