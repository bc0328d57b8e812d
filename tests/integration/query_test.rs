use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;
use thermolog::core::logstore::{LogEntry, LogStore};
use thermolog::core::query::{aggregate, query, Resolution};
use thermolog::core::stats::Summary;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 8, 2)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn reading(ts: NaiveDateTime, value: f64) -> LogEntry {
    LogEntry::new(ts, format!("Storage (2 devices) [Normal]: {:.1}°C", value))
}

fn populated_store() -> (TempDir, LogStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = LogStore::new(temp_dir.path());
    for minute in (0..45).step_by(5) {
        store.append(&reading(at(10, minute), 20.0 + minute as f64 / 5.0)).unwrap();
    }
    store
        .append(&LogEntry::system_event(at(10, 7), "Sensor Error", "No temperature data available"))
        .unwrap();
    store
        .append(&LogEntry::new(at(10, 12), "ALERT WARNING temperature 26.0°C from Storage"))
        .unwrap();
    (temp_dir, store)
}

#[test]
fn test_auto_query_over_45_minutes_uses_ten_minute_buckets() {
    let (_temp_dir, store) = populated_store();

    let result = query(&store, at(10, 0), at(10, 45), Resolution::Auto);
    assert_eq!(result.resolution, Resolution::Min10);

    let starts: Vec<NaiveDateTime> = result.points.iter().map(|p| p.bucket_start).collect();
    assert_eq!(starts, vec![at(10, 0), at(10, 10), at(10, 20), at(10, 30), at(10, 40)]);

    // 10:00 and 10:05 -> 20.0 and 21.0; events and alerts are not readings
    assert_eq!(result.points[0].samples, 2);
    assert!((result.points[0].mean - 20.5).abs() < 1e-9);
    assert_eq!(result.points[1].samples, 2);
    assert_eq!(result.points[4].samples, 1);
}

#[test]
fn test_query_excludes_out_of_range_readings() {
    let (_temp_dir, store) = populated_store();

    let result = query(&store, at(10, 10), at(10, 20), Resolution::Raw);
    let values: Vec<f64> = result.points.iter().map(|p| p.mean).collect();
    assert_eq!(values, vec![22.0, 23.0, 24.0]);
}

#[test]
fn test_query_empty_range() {
    let (_temp_dir, store) = populated_store();

    let result = query(&store, at(18, 0), at(19, 0), Resolution::Auto);
    assert!(result.points.is_empty());
    assert!(Summary::from_points(&result.points).is_none());
}

#[test]
fn test_summary_of_query_is_weighted() {
    let (_temp_dir, store) = populated_store();

    let result = query(&store, at(10, 0), at(10, 45), Resolution::Hour);
    assert_eq!(result.points.len(), 1);

    let summary = Summary::from_points(&result.points).unwrap();
    assert_eq!(summary.count, 9);
    assert!((summary.mean - 24.0).abs() < 1e-9);

    let raw = Summary::from_entries(&store.read_all()).unwrap();
    assert_eq!(raw.count, 9);
    assert_eq!(raw.min, 20.0);
    assert_eq!(raw.max, 28.0);
    assert_eq!(raw.latest, 28.0);
}

#[test]
fn test_aggregate_auto_uses_entry_span() {
    let entries = vec![reading(at(0, 0), 20.0), reading(at(20, 0), 30.0)];
    let points = aggregate(&entries, Resolution::Auto);
    // 20h span -> 30 minute buckets
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].bucket_start, at(20, 0));
}

#[test]
fn test_settings_events_do_not_count_as_readings() {
    let temp_dir = TempDir::new().unwrap();
    let store = LogStore::new(temp_dir.path());
    store.append(&reading(at(9, 0), 20.0)).unwrap();
    store
        .append(&LogEntry::system_event(
            at(9, 1),
            "Settings Update",
            "Thresholds updated - Warning: 40.0°C, Critical: 50.0°C",
        ))
        .unwrap();
    store
        .append(&LogEntry::system_event(
            at(9, 2),
            "Settings Update",
            "Thresholds updated: Warning=40.0°C, Critical=50.0°C",
        ))
        .unwrap();

    let result = query(&store, at(9, 0), at(9, 5), Resolution::Raw);
    let values: Vec<f64> = result.points.iter().map(|p| p.mean).collect();
    assert_eq!(values, vec![20.0]);

    let summary = Summary::from_entries(&store.read_all()).unwrap();
    assert_eq!(summary.count, 1);
    assert_eq!(summary.max, 20.0);
}
