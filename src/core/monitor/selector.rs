//! Picks one representative temperature out of a poll cycle's candidates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::reading::{CandidateReading, SensorCategory};
use crate::error::{Result, ThermologError};

/// Per-category systematic correction, added to the category mean.
///
/// These compensate for sensors that sit well above ambient and are
/// independent of the user-facing adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub storage: f64,
    pub gpu: f64,
    pub cpu: f64,
    pub other: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            storage: -13.0,
            gpu: -8.0,
            cpu: -10.0,
            other: 0.0,
        }
    }
}

impl Calibration {
    /// No correction for any category
    pub fn none() -> Self {
        Self {
            storage: 0.0,
            gpu: 0.0,
            cpu: 0.0,
            other: 0.0,
        }
    }

    pub fn offset_for(&self, category: SensorCategory) -> f64 {
        match category {
            SensorCategory::Storage => self.storage,
            SensorCategory::Gpu => self.gpu,
            SensorCategory::Cpu => self.cpu,
            SensorCategory::Other => self.other,
        }
    }

    pub fn with_offset(mut self, category: SensorCategory, offset: f64) -> Self {
        match category {
            SensorCategory::Storage => self.storage = offset,
            SensorCategory::Gpu => self.gpu = offset,
            SensorCategory::Cpu => self.cpu = offset,
            SensorCategory::Other => self.other = offset,
        }
        self
    }
}

/// Outcome of a source selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub value: f64,
    pub source: String,
    pub category: SensorCategory,
    pub members: usize,
}

/// Policy turning a set of labeled candidates into one value.
pub trait SourceSelector: Send {
    fn select(&self, candidates: &[CandidateReading]) -> Result<Selection>;

    /// Take new per-category corrections. Selectors that do not calibrate
    /// ignore them.
    fn set_calibration(&mut self, _calibration: Calibration) {}
}

/// Category-priority selection: Storage, then GPU, then CPU, then anything.
#[derive(Debug, Clone, Default)]
pub struct PrioritySelector {
    calibration: Calibration,
}

impl PrioritySelector {
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }
}

impl SourceSelector for PrioritySelector {
    fn select(&self, candidates: &[CandidateReading]) -> Result<Selection> {
        let mut groups: BTreeMap<SensorCategory, Vec<&CandidateReading>> = BTreeMap::new();
        for candidate in candidates.iter().filter(|c| c.value.is_finite()) {
            groups.entry(candidate.category).or_default().push(candidate);
        }

        // BTreeMap iterates in declaration order, which is the priority order
        let (category, members) = groups
            .into_iter()
            .find(|(_, members)| !members.is_empty())
            .ok_or(ThermologError::NoCandidates)?;

        let correction = self.calibration.offset_for(category);

        if category == SensorCategory::Cpu {
            if let Some(package) = members
                .iter()
                .find(|c| c.label.to_lowercase().contains("package"))
            {
                return Ok(Selection {
                    value: package.value + correction,
                    source: "CPU Package".to_string(),
                    category,
                    members: 1,
                });
            }
        }

        let count = members.len();
        let mean = members.iter().map(|c| c.value).sum::<f64>() / count as f64;

        Ok(Selection {
            value: mean + correction,
            source: format!("{} ({} {})", category, count, category.member_noun(count)),
            category,
            members: count,
        })
    }

    fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
    }
}
