use std::fs;
use tempfile::TempDir;
use thermolog::core::config::Settings;
use thermolog::core::monitor::Thresholds;

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::load_from(&temp_dir.path().join("settings.json")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_empty_and_corrupt_files_yield_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    fs::write(&path, "").unwrap();
    assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());

    fs::write(&path, "{ not json").unwrap();
    assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
}

#[test]
fn test_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("settings.json");

    let mut settings = Settings::default();
    settings.update_thresholds(40.0, 55.0).unwrap();
    settings.set_adjustment(-2.5, true).unwrap();
    settings.set_refresh_interval(10).unwrap();
    settings.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.thresholds(), Thresholds::new(40.0, 55.0).unwrap());
    assert_eq!(loaded.adjustment().apply(30.0), 27.5);
}

#[test]
fn test_invalid_stored_thresholds_fall_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{"warning_temp": 60.0, "critical_temp": 50.0, "refresh_interval_secs": 0}"#,
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.thresholds(), Thresholds::default());
    assert_eq!(settings.refresh_interval_secs, 2);
}

#[test]
fn test_failed_update_is_not_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");

    let mut settings = Settings::default();
    settings.save_to(&path).unwrap();
    assert!(settings.update_thresholds(35.0, 30.0).is_err());

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded.warning_temp, 25.0);
    assert_eq!(loaded.critical_temp, 30.0);
}
