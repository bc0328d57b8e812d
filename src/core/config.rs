use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::logstore::DEFAULT_LOG_DIR;
use crate::core::monitor::{adjust, Adjustment, Calibration, Thresholds};
use crate::error::ThermologError;

pub const MIN_REFRESH_SECS: u64 = 1;
pub const MAX_REFRESH_SECS: u64 = 300;

/// User settings, persisted as a flat JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub warning_temp: f64,
    pub critical_temp: f64,
    pub adjustment_offset: f64,
    pub adjustment_enabled: bool,
    /// Optional bound on the adjustment offset (±limit)
    pub offset_limit: Option<f64>,
    pub refresh_interval_secs: u64,
    pub alerts_enabled: bool,
    pub alert_cooldown_secs: u64,
    pub email_cooldown_secs: u64,
    pub report_interval_secs: u64,
    pub report_check_secs: u64,
    pub log_dir: String,
    pub calibration: Calibration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            warning_temp: 25.0,
            critical_temp: 30.0,
            adjustment_offset: 0.0,
            adjustment_enabled: false,
            offset_limit: None,
            refresh_interval_secs: 2,
            alerts_enabled: true,
            alert_cooldown_secs: 3600,
            email_cooldown_secs: 3600,
            report_interval_secs: 3600,
            report_check_secs: 60,
            log_dir: DEFAULT_LOG_DIR.to_string(),
            calibration: Calibration::default(),
        }
    }
}

impl Settings {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`. A missing, empty or unreadable document yields the
    /// defaults; stored thresholds that violate ordering are discarded.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let data = fs::read(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;

        if data.is_empty() {
            return Ok(Settings::default());
        }

        let mut settings: Settings = serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!("Settings file {:?} is corrupted ({}), using defaults", path, e);
            Settings::default()
        });
        settings.sanitize();
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
            }
        }

        let data = serde_json::to_vec_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write settings file: {:?}", path))?;

        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("thermolog").join("settings.json"))
    }

    // Hand-edited documents can hold anything; fall back per field
    fn sanitize(&mut self) {
        let defaults = Settings::default();
        if Thresholds::new(self.warning_temp, self.critical_temp).is_err() {
            log::warn!(
                "Stored thresholds {}/{} are invalid, using defaults",
                self.warning_temp,
                self.critical_temp
            );
            self.warning_temp = defaults.warning_temp;
            self.critical_temp = defaults.critical_temp;
        }
        if !(MIN_REFRESH_SECS..=MAX_REFRESH_SECS).contains(&self.refresh_interval_secs) {
            self.refresh_interval_secs = defaults.refresh_interval_secs;
        }
        if adjust::validate_offset(self.adjustment_offset, self.offset_limit).is_err() {
            self.adjustment_offset = defaults.adjustment_offset;
            self.offset_limit = defaults.offset_limit;
        }
        if self.report_check_secs == 0 {
            self.report_check_secs = defaults.report_check_secs;
        }
    }

    // Validated views

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.warning_temp, self.critical_temp).unwrap_or_default()
    }

    pub fn adjustment(&self) -> Adjustment {
        Adjustment {
            offset: self.adjustment_offset,
            enabled: self.adjustment_enabled,
            limit: self.offset_limit,
        }
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn alert_cooldown(&self) -> Duration {
        Duration::from_secs(self.alert_cooldown_secs)
    }

    pub fn email_cooldown(&self) -> Duration {
        Duration::from_secs(self.email_cooldown_secs)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    pub fn report_check(&self) -> Duration {
        Duration::from_secs(self.report_check_secs.max(1))
    }

    // Validated setters. On error nothing is modified.

    pub fn update_thresholds(&mut self, warning: f64, critical: f64) -> crate::Result<Thresholds> {
        let thresholds = Thresholds::new(warning, critical)?;
        self.warning_temp = warning;
        self.critical_temp = critical;
        Ok(thresholds)
    }

    pub fn set_adjustment(&mut self, offset: f64, enabled: bool) -> crate::Result<Adjustment> {
        adjust::validate_offset(offset, self.offset_limit)?;
        self.adjustment_offset = offset;
        self.adjustment_enabled = enabled;
        Ok(self.adjustment())
    }

    pub fn set_offset_limit(&mut self, limit: Option<f64>) -> crate::Result<()> {
        adjust::validate_offset(self.adjustment_offset, limit)?;
        self.offset_limit = limit;
        Ok(())
    }

    pub fn set_refresh_interval(&mut self, secs: u64) -> crate::Result<()> {
        if !(MIN_REFRESH_SECS..=MAX_REFRESH_SECS).contains(&secs) {
            return Err(ThermologError::validation(format!(
                "Refresh interval must be between {} and {} seconds, got {}",
                MIN_REFRESH_SECS, MAX_REFRESH_SECS, secs
            )));
        }
        self.refresh_interval_secs = secs;
        Ok(())
    }
}
