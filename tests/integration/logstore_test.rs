use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use thermolog::core::logstore::{LiveTail, LogEntry, LogStore};

fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 8, day)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn store() -> (TempDir, LogStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = LogStore::new(temp_dir.path().join("Daily logs"));
    (temp_dir, store)
}

#[test]
fn test_empty_store_reads_nothing() {
    let (_temp_dir, store) = store();
    assert!(store.log_files().is_empty());
    assert!(store.read_all().is_empty());
    assert!(store.read_range(at(1, 0, 0, 0), at(2, 0, 0, 0)).is_empty());
}

#[test]
fn test_single_entry_roundtrip() {
    let (_temp_dir, store) = store();
    let entry = LogEntry::new(at(2, 13, 5, 9), "Storage (2 devices) [Normal]: 19.0°C");
    store.append(&entry).unwrap();

    assert_eq!(store.read_all(), vec![entry]);
    let file = store.dir().join("temperature_logs_2024-08-02.logs");
    assert_eq!(
        fs::read_to_string(file).unwrap(),
        "[2024-08-02 13:05:09] Storage (2 devices) [Normal]: 19.0°C\n"
    );
}

#[test]
fn test_entries_split_by_date_and_read_in_order() {
    let (_temp_dir, store) = store();
    let entries: Vec<LogEntry> = (0..6)
        .map(|i| LogEntry::new(at(1 + i / 3, 23, 58, i), format!("Sensor: {}.0°C", 20 + i)))
        .collect();
    for entry in &entries {
        store.append(entry).unwrap();
    }

    assert_eq!(store.log_files().len(), 2);
    assert_eq!(store.read_all(), entries);
}

#[test]
fn test_read_range_is_inclusive_and_spans_files() {
    let (_temp_dir, store) = store();
    for (ts, text) in [
        (at(1, 22, 0, 0), "before"),
        (at(1, 23, 0, 0), "start"),
        (at(2, 1, 0, 0), "middle"),
        (at(3, 0, 30, 0), "end"),
        (at(3, 0, 31, 0), "after"),
    ] {
        store.append(&LogEntry::new(ts, text)).unwrap();
    }

    let texts: Vec<String> = store
        .read_range(at(1, 23, 0, 0), at(3, 0, 30, 0))
        .into_iter()
        .map(|e| e.text)
        .collect();
    assert_eq!(texts, vec!["start", "middle", "end"]);
}

#[test]
fn test_malformed_and_blank_lines_skipped() {
    let (_temp_dir, store) = store();
    fs::create_dir_all(store.dir()).unwrap();
    fs::write(
        store.path_for(at(2, 0, 0, 0).date()),
        "[2024-08-02 10:00:00] first\n\ngarbage line\n[2024-08-02 25:00:00] bad hour\n  [2024-08-02 10:01:00] second  \n",
    )
    .unwrap();

    let texts: Vec<String> = store.read_all().into_iter().map(|e| e.text).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[test]
fn test_unrelated_files_ignored() {
    let (_temp_dir, store) = store();
    store.append(&LogEntry::new(at(2, 9, 0, 0), "kept")).unwrap();
    fs::write(store.dir().join("notes.txt"), "[2024-08-02 09:00:00] not a log\n").unwrap();
    fs::write(
        store.dir().join("temperature_logs_latest.logs"),
        "[2024-08-02 09:00:00] bad name\n",
    )
    .unwrap();

    assert_eq!(store.log_files().len(), 1);
    assert_eq!(store.read_all().len(), 1);
}

#[test]
fn test_legacy_encoded_file_readable() {
    let (_temp_dir, store) = store();
    fs::create_dir_all(store.dir()).unwrap();
    // Windows-1252 degree sign
    let mut bytes = b"[2024-08-02 08:00:00] Storage (1 device) [Normal]: 21.5".to_vec();
    bytes.extend_from_slice(&[0xB0, b'C', b'\n']);
    fs::write(store.path_for(at(2, 0, 0, 0).date()), bytes).unwrap();

    let entries = store.read_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Storage (1 device) [Normal]: 21.5°C");
}

#[test]
fn test_utf16_file_readable() {
    let (_temp_dir, store) = store();
    fs::create_dir_all(store.dir()).unwrap();
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "[2024-08-02 08:00:00] CPU Package [Normal]: 22.0°C\r\n".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(store.path_for(at(2, 0, 0, 0).date()), bytes).unwrap();

    let entries = store.read_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "CPU Package [Normal]: 22.0°C");
}

#[test]
fn test_read_since_cursor_only_returns_new_entries() {
    let (_temp_dir, store) = store();
    store.append(&LogEntry::new(at(2, 9, 0, 0), "one")).unwrap();
    store.append(&LogEntry::new(at(2, 9, 0, 2), "two")).unwrap();

    let (entries, cursor) = store.read_since_cursor(0);
    assert_eq!(entries.len(), 2);
    assert_eq!(cursor, 2);

    let (entries, cursor) = store.read_since_cursor(cursor);
    assert!(entries.is_empty());
    assert_eq!(cursor, 2);

    store.append(&LogEntry::new(at(2, 9, 0, 4), "three")).unwrap();
    let (entries, cursor) = store.read_since_cursor(cursor);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "three");
    assert_eq!(cursor, 3);
}

#[test]
fn test_cursor_past_end_resyncs() {
    let (_temp_dir, store) = store();
    store.append(&LogEntry::new(at(2, 9, 0, 0), "one")).unwrap();

    let (entries, cursor) = store.read_since_cursor(50);
    assert!(entries.is_empty());
    assert_eq!(cursor, 1);
}

#[test]
fn test_live_tail_from_end_skips_history() {
    let (_temp_dir, store) = store();
    let store = Arc::new(store);
    store.append(&LogEntry::new(at(2, 9, 0, 0), "old")).unwrap();

    let mut tail = LiveTail::from_end(store.clone());
    assert_eq!(tail.cursor(), 1);
    assert!(tail.poll().is_empty());

    store.append(&LogEntry::new(at(2, 9, 0, 2), "new")).unwrap();
    let fresh = tail.poll();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].text, "new");
}

#[test]
fn test_concurrent_appends_keep_lines_whole() {
    let (_temp_dir, store) = store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let text = format!("worker {} entry {}", worker, i);
                    store.append(&LogEntry::new(at(2, 12, 0, 0), text)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let entries = store.read_all();
    assert_eq!(entries.len(), 200);
    for worker in 0..4 {
        // Per-producer order survives interleaving
        let own: Vec<String> = entries
            .iter()
            .filter(|e| e.text.starts_with(&format!("worker {} ", worker)))
            .map(|e| e.text.clone())
            .collect();
        let expected: Vec<String> = (0..50).map(|i| format!("worker {} entry {}", worker, i)).collect();
        assert_eq!(own, expected);
    }
}
