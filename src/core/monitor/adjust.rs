use serde::{Deserialize, Serialize};

use crate::error::{Result, ThermologError};

/// Apply a signed user offset to a raw value.
pub fn adjust(raw: f64, offset: f64, enabled: bool) -> f64 {
    if enabled {
        raw + offset
    } else {
        raw
    }
}

/// User-facing adjustment: a signed offset that can be switched off,
/// optionally bounded to `±limit`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Adjustment {
    pub offset: f64,
    pub enabled: bool,
    #[serde(default)]
    pub limit: Option<f64>,
}

impl Adjustment {
    pub fn new(offset: f64, enabled: bool) -> Self {
        Self {
            offset,
            enabled,
            limit: None,
        }
    }

    /// Same adjustment, rejecting offsets outside `±limit`
    pub fn bounded(offset: f64, enabled: bool, limit: f64) -> Result<Self> {
        validate_offset(offset, Some(limit))?;
        Ok(Self {
            offset,
            enabled,
            limit: Some(limit),
        })
    }

    pub fn apply(&self, raw: f64) -> f64 {
        adjust(raw, self.effective_offset(), self.enabled)
    }

    /// Offset actually applied; clamped when a limit is configured
    pub fn effective_offset(&self) -> f64 {
        match self.limit {
            Some(limit) if limit >= 0.0 => self.offset.clamp(-limit, limit),
            _ => self.offset,
        }
    }
}

pub(crate) fn validate_offset(offset: f64, limit: Option<f64>) -> Result<()> {
    if !offset.is_finite() {
        return Err(ThermologError::validation(
            "Adjustment offset must be a finite number",
        ));
    }
    if let Some(limit) = limit {
        if !limit.is_finite() || limit < 0.0 {
            return Err(ThermologError::validation(format!(
                "Offset limit must be a non-negative number, got {}",
                limit
            )));
        }
        if offset.abs() > limit {
            return Err(ThermologError::validation(format!(
                "Adjustment offset {:+.1}°C is outside the allowed range ±{:.1}°C",
                offset, limit
            )));
        }
    }
    Ok(())
}
