//! Temperature sensor sources feeding the poll loop.

use sysinfo::Components;

use crate::core::monitor::{CandidateReading, SensorCategory};
use crate::error::Result;

/// Supplies the candidate readings for one poll cycle.
///
/// An empty list is a valid "no data" answer, not an error.
pub trait SensorSource: Send {
    fn candidates(&mut self) -> Result<Vec<CandidateReading>>;
}

const STORAGE_KEYWORDS: &[&str] = &[
    "nvme", "ssd", "hdd", "disk", "drive", "sata", "drivetemp", "m.2",
];
const GPU_KEYWORDS: &[&str] = &[
    "gpu", "amdgpu", "nouveau", "radeon", "nvidia", "geforce", "graphics",
];
const CPU_KEYWORDS: &[&str] = &[
    "cpu", "core", "package", "tctl", "tdie", "coretemp", "k10temp", "zenpower",
];

/// Category of a sensor from its label, checked in selection priority order
pub fn categorize(label: &str) -> SensorCategory {
    let lower = label.to_lowercase();
    let has_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if has_any(STORAGE_KEYWORDS) {
        SensorCategory::Storage
    } else if has_any(GPU_KEYWORDS) {
        SensorCategory::Gpu
    } else if has_any(CPU_KEYWORDS) {
        SensorCategory::Cpu
    } else {
        SensorCategory::Other
    }
}

/// Hardware sensors exposed by the OS through `sysinfo`
pub struct ComponentSensors {
    components: Components,
}

impl ComponentSensors {
    pub fn new() -> Self {
        Self {
            components: Components::new_with_refreshed_list(),
        }
    }
}

impl Default for ComponentSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for ComponentSensors {
    fn candidates(&mut self) -> Result<Vec<CandidateReading>> {
        self.components.refresh(true);

        Ok(self
            .components
            .iter()
            .filter_map(|comp| {
                let value = comp.temperature()?;
                // Zero means the driver has nothing to report
                if !value.is_finite() || value == 0.0 {
                    return None;
                }
                let label = comp.label().to_string();
                let group_key = label
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                Some(CandidateReading {
                    category: categorize(&label),
                    value: f64::from(value),
                    label,
                    group_key,
                })
            })
            .collect())
    }
}

/// Fixed candidate list, for simulation and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSensors {
    readings: Vec<CandidateReading>,
}

impl StaticSensors {
    pub fn new(readings: Vec<CandidateReading>) -> Self {
        Self { readings }
    }

    /// A plausible desktop: two drives, a GPU and a CPU package
    pub fn simulated() -> Self {
        Self::new(vec![
            CandidateReading::new("Temperature", 34.0, SensorCategory::Storage, "Samsung SSD 980"),
            CandidateReading::new("Temperature", 36.0, SensorCategory::Storage, "WDC WD20EZRZ"),
            CandidateReading::new("GPU Core", 48.0, SensorCategory::Gpu, "NVIDIA GeForce"),
            CandidateReading::new("CPU Package", 52.0, SensorCategory::Cpu, "CPU"),
        ])
    }
}

impl SensorSource for StaticSensors {
    fn candidates(&mut self) -> Result<Vec<CandidateReading>> {
        Ok(self.readings.clone())
    }
}
