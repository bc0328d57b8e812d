use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hardware category a candidate sensor belongs to.
///
/// Declaration order is the selection priority: the first category with at
/// least one member wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SensorCategory {
    Storage,
    Gpu,
    Cpu,
    Other,
}

impl SensorCategory {
    pub const PRIORITY: [SensorCategory; 4] = [
        SensorCategory::Storage,
        SensorCategory::Gpu,
        SensorCategory::Cpu,
        SensorCategory::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SensorCategory::Storage => "Storage",
            SensorCategory::Gpu => "GPU",
            SensorCategory::Cpu => "CPU",
            SensorCategory::Other => "Other",
        }
    }

    /// Noun used when describing how many members were averaged
    pub(crate) fn member_noun(&self, count: usize) -> &'static str {
        match (self, count) {
            (SensorCategory::Storage, 1) => "device",
            (SensorCategory::Storage, _) => "devices",
            (SensorCategory::Cpu, 1) => "core",
            (SensorCategory::Cpu, _) => "cores",
            (_, 1) => "sensor",
            (_, _) => "sensors",
        }
    }
}

impl fmt::Display for SensorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One labeled raw sensor value considered before source selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateReading {
    pub label: String,
    pub value: f64,
    pub category: SensorCategory,
    /// Physical device the sensor hangs off (drive model, GPU name, ...)
    pub group_key: String,
}

impl CandidateReading {
    pub fn new(
        label: impl Into<String>,
        value: f64,
        category: SensorCategory,
        group_key: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value,
            category,
            group_key: group_key.into(),
        }
    }
}

/// Status tier of an adjusted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    Normal,
    Warning,
    Critical,
    #[default]
    Unknown,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Status::Normal => "Normal",
            Status::Warning => "Warning",
            Status::Critical => "Critical",
            Status::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully classified sample, produced once per poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    /// Adjusted value (calibration and user offset applied)
    pub value: f64,
    pub source: String,
    pub status: Status,
}

impl Reading {
    /// Text persisted to the log.
    ///
    /// The value must directly precede the unit marker and follow a colon,
    /// otherwise the query parser cannot recover it.
    pub fn log_text(&self) -> String {
        format!(
            "{} [{}]: {:.1}{}",
            self.source,
            self.status,
            self.value,
            crate::core::logstore::UNIT_MARKER
        )
    }
}

/// What the live view receives after each poll iteration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum LiveSample {
    #[default]
    Pending,
    NoData {
        timestamp: NaiveDateTime,
        reason: String,
    },
    Reading(Reading),
}
