//! Threshold classification of adjusted values.

use serde::Serialize;

use super::reading::Status;
use crate::error::{Result, ThermologError};

/// Two ordered thresholds. `warning < critical` always holds for values
/// built through [`Thresholds::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    warning: f64,
    critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: 25.0,
            critical: 30.0,
        }
    }
}

impl Thresholds {
    pub fn new(warning: f64, critical: f64) -> Result<Self> {
        if !warning.is_finite() || !critical.is_finite() {
            return Err(ThermologError::validation(
                "Thresholds must be finite numbers",
            ));
        }
        if warning >= critical {
            return Err(ThermologError::validation(format!(
                "Warning temperature ({:.1}°C) must be lower than critical temperature ({:.1}°C)",
                warning, critical
            )));
        }
        Ok(Self { warning, critical })
    }

    pub fn warning(&self) -> f64 {
        self.warning
    }

    pub fn critical(&self) -> f64 {
        self.critical
    }
}

/// Map a value to its status tier. Both thresholds are inclusive.
pub fn classify(value: Option<f64>, thresholds: &Thresholds) -> Status {
    match value {
        None => Status::Unknown,
        Some(v) if v.is_nan() => Status::Unknown,
        Some(v) if v >= thresholds.critical => Status::Critical,
        Some(v) if v >= thresholds.warning => Status::Warning,
        Some(_) => Status::Normal,
    }
}
