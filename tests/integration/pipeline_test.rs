use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thermolog::core::config::Settings;
use thermolog::core::monitor::{
    AlertIntent, CandidateReading, LiveSample, Mailer, Monitor, Notifier, ReportIntent,
    SensorCategory, Selection, SourceSelector, Status,
};
use thermolog::{Result, ThermologError};

#[derive(Default)]
struct Outbox {
    notifications: Mutex<Vec<String>>,
    emails: Mutex<Vec<String>>,
}

impl Notifier for Outbox {
    fn notify(&self, alert: &AlertIntent) -> Result<()> {
        self.notifications.lock().push(alert.title().to_string());
        Ok(())
    }
}

impl Mailer for Outbox {
    fn send_alert(&self, alert: &AlertIntent) -> Result<()> {
        self.emails.lock().push(alert.subject());
        Ok(())
    }

    fn send_report(&self, report: &ReportIntent) -> Result<()> {
        self.emails.lock().push(report.subject());
        Ok(())
    }
}

/// Always reports the hottest candidate, uncalibrated
struct HottestSelector;

impl SourceSelector for HottestSelector {
    fn select(&self, candidates: &[CandidateReading]) -> Result<Selection> {
        let hottest = candidates
            .iter()
            .filter(|c| c.value.is_finite())
            .max_by(|a, b| a.value.total_cmp(&b.value))
            .ok_or(ThermologError::NoCandidates)?;
        Ok(Selection {
            value: hottest.value,
            source: hottest.label.clone(),
            category: hottest.category,
            members: 1,
        })
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 8, 2)
        .unwrap()
        .and_hms_opt(15, 0, 0)
        .unwrap()
}

fn desktop() -> Vec<CandidateReading> {
    vec![
        CandidateReading::new("Temperature", 30.0, SensorCategory::Storage, "disk0"),
        CandidateReading::new("Temperature", 32.0, SensorCategory::Storage, "disk1"),
        CandidateReading::new("GPU Core", 60.0, SensorCategory::Gpu, "gpu0"),
    ]
}

#[test]
fn test_storage_preferred_and_calibrated() {
    let outbox = Arc::new(Outbox::default());
    let mut monitor = Monitor::new(&Settings::default(), outbox.clone(), outbox.clone());

    let outcome = monitor.process(Ok(desktop()), now(), Instant::now());
    match outcome.sample {
        LiveSample::Reading(reading) => {
            assert_eq!(reading.source, "Storage (2 devices)");
            assert_eq!(reading.value, 18.0);
            assert_eq!(reading.status, Status::Normal);
        }
        other => panic!("unexpected sample {:?}", other),
    }
}

#[test]
fn test_custom_selector() {
    let outbox = Arc::new(Outbox::default());
    let mut monitor = Monitor::new(&Settings::default(), outbox.clone(), outbox.clone())
        .with_selector(Box::new(HottestSelector));

    let outcome = monitor.process(Ok(desktop()), now(), Instant::now());
    assert_eq!(outcome.entries[0].text, "GPU Core [Critical]: 60.0°C");
    assert_eq!(outbox.notifications.lock().len(), 1);
    assert_eq!(outbox.emails.lock().len(), 1);
}

#[test]
fn test_custom_selector_survives_settings_change() {
    let outbox = Arc::new(Outbox::default());
    let mut settings = Settings::default();
    let mut monitor = Monitor::new(&settings, outbox.clone(), outbox.clone())
        .with_selector(Box::new(HottestSelector));

    settings.update_thresholds(70.0, 80.0).unwrap();
    monitor.apply_settings(&settings);

    let outcome = monitor.process(Ok(desktop()), now(), Instant::now());
    assert_eq!(outcome.entries[0].text, "GPU Core [Normal]: 60.0°C");
    assert!(outbox.notifications.lock().is_empty());
}

#[test]
fn test_new_value_bypasses_cooldown_same_value_does_not() {
    let outbox = Arc::new(Outbox::default());
    let mut monitor = Monitor::new(&Settings::default(), outbox.clone(), outbox.clone())
        .with_selector(Box::new(HottestSelector));
    let t0 = Instant::now();
    let gpu = |v| Ok(vec![CandidateReading::new("GPU Core", v, SensorCategory::Gpu, "gpu0")]);

    monitor.process(gpu(31.2), now(), t0);
    // Rounds to the same key
    monitor.process(gpu(30.8), now(), t0 + Duration::from_secs(5));
    // Different key
    monitor.process(gpu(33.0), now(), t0 + Duration::from_secs(10));
    // Same key again, after the window
    monitor.process(gpu(31.0), now(), t0 + Duration::from_secs(3601));

    assert_eq!(outbox.notifications.lock().len(), 3);
    assert_eq!(outbox.emails.lock().len(), 3);
}

#[test]
fn test_settings_change_applies_to_next_iteration() {
    let outbox = Arc::new(Outbox::default());
    let mut settings = Settings::default();
    let mut monitor = Monitor::new(&settings, outbox.clone(), outbox.clone());

    settings.update_thresholds(10.0, 15.0).unwrap();
    monitor.apply_settings(&settings);

    let outcome = monitor.process(Ok(desktop()), now(), Instant::now());
    match outcome.sample {
        LiveSample::Reading(reading) => assert_eq!(reading.status, Status::Critical),
        other => panic!("unexpected sample {:?}", other),
    }
}
