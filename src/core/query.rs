//! Time-range aggregation over log entries.
//!
//! Turns log lines back into numbers and averages them into fixed-width
//! buckets for graphing.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::logstore::{LogEntry, LogStore, SYSTEM_TAG, UNIT_MARKER};
use crate::error::{Result, ThermologError};

/// Display resolution of an aggregated query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Resolution {
    #[default]
    Auto,
    Min10,
    Min30,
    Hour,
    Day,
    Raw,
}

impl Resolution {
    /// Concrete resolution for a query span; non-`Auto` values pass through.
    pub fn resolve(self, span: Duration) -> Resolution {
        match self {
            Resolution::Auto if span <= Duration::hours(1) => Resolution::Min10,
            Resolution::Auto if span <= Duration::days(1) => Resolution::Min30,
            Resolution::Auto => Resolution::Hour,
            other => other,
        }
    }

    /// Start of the bucket containing `ts`, or `None` for `Raw`/`Auto`
    pub fn bucket_start(self, ts: NaiveDateTime) -> Option<NaiveDateTime> {
        let date = ts.date();
        let (hour, minute) = (ts.hour(), ts.minute());
        match self {
            Resolution::Min10 => date.and_hms_opt(hour, minute - minute % 10, 0),
            Resolution::Min30 => date.and_hms_opt(hour, minute - minute % 30, 0),
            Resolution::Hour => date.and_hms_opt(hour, 0, 0),
            Resolution::Day => date.and_hms_opt(0, 0, 0),
            Resolution::Auto | Resolution::Raw => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Auto => "auto",
            Resolution::Min10 => "10m",
            Resolution::Min30 => "30m",
            Resolution::Hour => "1h",
            Resolution::Day => "1d",
            Resolution::Raw => "raw",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Resolution {
    type Err = ThermologError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Resolution::Auto),
            "10m" | "10min" | "min10" => Ok(Resolution::Min10),
            "30m" | "30min" | "min30" => Ok(Resolution::Min30),
            "1h" | "hour" => Ok(Resolution::Hour),
            "1d" | "day" => Ok(Resolution::Day),
            "raw" => Ok(Resolution::Raw),
            other => Err(ThermologError::parse(format!(
                "unknown resolution '{}' (expected auto, 10m, 30m, 1h, 1d or raw)",
                other
            ))),
        }
    }
}

/// One point of an aggregated series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub bucket_start: NaiveDateTime,
    pub mean: f64,
    pub samples: usize,
}

/// Extract the temperature from an entry's text.
///
/// Takes the text before the first unit marker and parses the token after
/// its last colon: `"Storage (2 devices) [Normal]: 19.0°C"` gives 19.0.
/// System events never carry a reading, whatever their detail says.
pub fn parse_temperature(text: &str) -> Option<f64> {
    if text.starts_with(SYSTEM_TAG) {
        return None;
    }
    let (before, _) = text.split_once(UNIT_MARKER)?;
    let (_, token) = before.rsplit_once(':')?;
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Aggregate entries at `resolution`. `Auto` resolves from the span between
/// the earliest and latest entry.
pub fn aggregate(entries: &[LogEntry], resolution: Resolution) -> Vec<DataPoint> {
    let resolution = match resolution {
        Resolution::Auto => {
            let span = entries
                .iter()
                .map(|e| e.timestamp)
                .min()
                .zip(entries.iter().map(|e| e.timestamp).max())
                .map(|(first, last)| last - first)
                .unwrap_or_else(Duration::zero);
            Resolution::Auto.resolve(span)
        }
        other => other,
    };
    aggregate_resolved(entries, resolution)
}

fn aggregate_resolved(entries: &[LogEntry], resolution: Resolution) -> Vec<DataPoint> {
    let values = entries
        .iter()
        .filter_map(|e| parse_temperature(&e.text).map(|v| (e.timestamp, v)));

    if resolution == Resolution::Raw {
        return values
            .map(|(ts, v)| DataPoint {
                bucket_start: ts,
                mean: v,
                samples: 1,
            })
            .collect();
    }

    let mut buckets: BTreeMap<NaiveDateTime, (f64, usize)> = BTreeMap::new();
    for (ts, value) in values {
        let Some(start) = resolution.bucket_start(ts) else {
            continue;
        };
        let bucket = buckets.entry(start).or_insert((0.0, 0));
        bucket.0 += value;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(bucket_start, (sum, samples))| DataPoint {
            bucket_start,
            mean: sum / samples as f64,
            samples,
        })
        .collect()
}

/// Result of a range query
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub resolution: Resolution,
    pub points: Vec<DataPoint>,
}

/// Read `[start, end]` from the store and aggregate it. `Auto` resolves from
/// the requested span, not from whatever data happens to exist.
pub fn query(
    store: &LogStore,
    start: NaiveDateTime,
    end: NaiveDateTime,
    resolution: Resolution,
) -> QueryResult {
    let resolution = resolution.resolve(end - start);
    let entries = store.read_range(start, end);
    QueryResult {
        start,
        end,
        resolution,
        points: aggregate_resolved(&entries, resolution),
    }
}
