// Platform-specific functionality module

pub mod sensors;

pub use sensors::{categorize, ComponentSensors, SensorSource, StaticSensors};

/// Machine name shown in alert emails
pub fn device_name() -> String {
    sysinfo::System::host_name().unwrap_or_else(|| "Unknown Device".to_string())
}
