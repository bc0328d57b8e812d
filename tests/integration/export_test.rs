use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;
use thermolog::core::export::{export, export_file_name, ExportMeta};
use thermolog::core::logstore::{LogEntry, LogStore};

fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 8, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[test]
fn test_export_of_store_range() {
    let temp_dir = TempDir::new().unwrap();
    let store = LogStore::new(temp_dir.path().join("logs"));
    store.append(&LogEntry::new(at(1, 23, 50), "outside")).unwrap();
    store
        .append(&LogEntry::new(at(2, 0, 10), "Storage (1 device) [Normal]: 20.0°C"))
        .unwrap();
    store
        .append(&LogEntry::system_event(at(2, 0, 20), "System Shutdown", "Temperature monitoring stopped"))
        .unwrap();

    let (start, end) = (at(2, 0, 0), at(2, 12, 0));
    let entries = store.read_range(start, end);
    let bytes = export(&entries, &ExportMeta::new(start, end, at(3, 9, 0)));
    let text = String::from_utf8(bytes).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "# Temperature Logs Export");
    assert_eq!(lines[1], "# Time Range: 2024-08-02 00:00 to 2024-08-02 12:00");
    assert_eq!(lines[4], "# Entries: 2");
    assert_eq!(lines[6], "=".repeat(60));
    assert_eq!(
        &lines[7..],
        &[
            "[2024-08-02 00:10:00] Storage (1 device) [Normal]: 20.0°C",
            "[2024-08-02 00:20:00] [SYSTEM] System Shutdown: Temperature monitoring stopped",
        ]
    );
    assert!(!text.contains("outside"));
}

#[test]
fn test_exported_body_parses_back() {
    let entries = vec![
        LogEntry::new(at(2, 8, 0), "GPU (1 device) [Warning]: 26.1°C"),
        LogEntry::new(at(2, 8, 1), "ALERT WARNING temperature 26.1°C from GPU (1 device)"),
    ];
    let text = String::from_utf8(export(&entries, &ExportMeta::new(at(2, 8, 0), at(2, 9, 0), at(2, 9, 0)))).unwrap();

    let parsed: Vec<LogEntry> = text
        .lines()
        .filter(|line| line.starts_with('['))
        .map(|line| LogEntry::parse_line(line).unwrap())
        .collect();
    assert_eq!(parsed, entries);
}

#[test]
fn test_export_file_name_from_range() {
    assert_eq!(
        export_file_name(at(1, 0, 0), at(2, 13, 30)),
        "temperature_export_2024-08-01_00-00_to_2024-08-02_13-30.logs"
    );
}
