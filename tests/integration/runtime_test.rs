use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;
use thermolog::core::config::Settings;
use thermolog::core::logstore::LogStore;
use thermolog::core::monitor::{
    CandidateReading, ConsoleNotifier, LiveSample, LogMailer, MonitorRuntime, SensorCategory,
};
use thermolog::platform::{SensorSource, StaticSensors};

/// Panics on its first read, then reports a single disk
struct FlakySensors {
    calls: usize,
}

impl SensorSource for FlakySensors {
    fn candidates(&mut self) -> thermolog::Result<Vec<CandidateReading>> {
        self.calls += 1;
        if self.calls == 1 {
            panic!("sensor bus reset");
        }
        Ok(vec![CandidateReading::new(
            "Temperature",
            33.0,
            SensorCategory::Storage,
            "disk0",
        )])
    }
}

fn start(store: Arc<LogStore>, sensors: impl SensorSource + 'static) -> MonitorRuntime {
    let mut settings = Settings::default();
    settings.set_refresh_interval(1).unwrap();
    settings.alerts_enabled = false;
    MonitorRuntime::start(
        settings,
        store,
        Box::new(sensors),
        Arc::new(ConsoleNotifier),
        Arc::new(LogMailer::new("test-host")),
    )
    .unwrap()
}

#[test]
fn test_runtime_logs_readings_between_startup_and_shutdown() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(LogStore::new(temp_dir.path()));
    let runtime = start(store.clone(), StaticSensors::simulated());

    thread::sleep(Duration::from_millis(1500));
    assert!(matches!(*runtime.latest(), LiveSample::Reading(_)));
    runtime.shutdown();

    let texts: Vec<String> = store.read_all().into_iter().map(|e| e.text).collect();
    assert!(texts.len() >= 3, "{:?}", texts);
    assert_eq!(
        texts.first().unwrap(),
        "[SYSTEM] System Startup: Temperature monitoring started"
    );
    assert_eq!(
        texts.last().unwrap(),
        "[SYSTEM] System Shutdown: Temperature monitoring stopped"
    );
    assert!(texts
        .iter()
        .any(|t| t.starts_with("Storage (2 devices) [Normal]:")));
}

#[test]
fn test_runtime_without_sensors_reports_no_data() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(LogStore::new(temp_dir.path()));
    let runtime = start(store.clone(), StaticSensors::new(Vec::new()));

    thread::sleep(Duration::from_millis(500));
    assert!(matches!(*runtime.latest(), LiveSample::NoData { .. }));
    runtime.shutdown();

    assert!(store
        .read_all()
        .iter()
        .any(|e| e.text == "[SYSTEM] Sensor Error: No temperature data available"));
}

#[test]
fn test_polling_survives_a_panicking_sensor_backend() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(LogStore::new(temp_dir.path()));
    let runtime = start(store.clone(), FlakySensors { calls: 0 });

    thread::sleep(Duration::from_millis(1500));
    assert!(matches!(*runtime.latest(), LiveSample::Reading(_)));
    runtime.shutdown();

    let texts: Vec<String> = store.read_all().into_iter().map(|e| e.text).collect();
    let error = texts
        .iter()
        .position(|t| t.starts_with("[SYSTEM] Sensor Error:") && t.contains("sensor bus reset"))
        .expect("sensor error logged");
    let reading = texts
        .iter()
        .position(|t| t == "Storage (1 device) [Normal]: 20.0°C")
        .expect("later tick logged a reading");
    assert!(error < reading, "{:?}", texts);
}
