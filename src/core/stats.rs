use chrono::NaiveDateTime;
use serde::Serialize;

use crate::core::logstore::LogEntry;
use crate::core::query::{parse_temperature, DataPoint};

/// Min/max/mean over a series of temperatures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
    /// Most recent value in the series
    pub latest: f64,
}

impl Summary {
    /// Summarize raw readings found in `entries`; `None` when none parse.
    pub fn from_entries(entries: &[LogEntry]) -> Option<Self> {
        Self::from_samples(
            entries
                .iter()
                .filter_map(|e| parse_temperature(&e.text).map(|v| (e.timestamp, v))),
        )
    }

    /// Summarize aggregated points, weighting each by its sample count.
    pub fn from_points(points: &[DataPoint]) -> Option<Self> {
        let mut summary = Self::from_samples(points.iter().map(|p| (p.bucket_start, p.mean)))?;
        let samples: usize = points.iter().map(|p| p.samples).sum();
        if samples > 0 {
            summary.mean =
                points.iter().map(|p| p.mean * p.samples as f64).sum::<f64>() / samples as f64;
            summary.count = samples;
        }
        Some(summary)
    }

    fn from_samples(samples: impl Iterator<Item = (NaiveDateTime, f64)>) -> Option<Self> {
        let mut summary: Option<Summary> = None;
        let mut sum = 0.0;

        for (ts, value) in samples {
            sum += value;
            match summary.as_mut() {
                None => {
                    summary = Some(Summary {
                        count: 1,
                        min: value,
                        max: value,
                        mean: value,
                        first: ts,
                        last: ts,
                        latest: value,
                    })
                }
                Some(s) => {
                    s.count += 1;
                    s.min = s.min.min(value);
                    s.max = s.max.max(value);
                    if ts < s.first {
                        s.first = ts;
                    }
                    if ts >= s.last {
                        s.last = ts;
                        s.latest = value;
                    }
                }
            }
        }

        summary.map(|mut s| {
            s.mean = sum / s.count as f64;
            s
        })
    }
}
