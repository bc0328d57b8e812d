use chrono::NaiveDateTime;
use colored::{ColoredString, Colorize};

use crate::core::logstore::{LogEntry, TIMESTAMP_FORMAT};
use crate::core::monitor::{LiveSample, Status};
use crate::core::query::DataPoint;

/// Width of the widest bar drawn by [`format_point`]
const BAR_WIDTH: usize = 40;

/// Temperature with one decimal, or `--°C` when there is no value
pub fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.1}°C", v),
        _ => "--°C".to_string(),
    }
}

/// Format timestamp in human-readable format (YYYY-MM-DD HH:MM)
pub fn format_time(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Status name in its alert color
pub fn status_colored(status: Status) -> ColoredString {
    match status {
        Status::Normal => status.name().green(),
        Status::Warning => status.name().yellow().bold(),
        Status::Critical => status.name().red().bold(),
        Status::Unknown => status.name().dimmed(),
    }
}

/// One line for the live view
pub fn format_sample(sample: &LiveSample) -> String {
    match sample {
        LiveSample::Pending => format!(
            "{}  {}",
            format_temperature(None),
            "waiting for first reading".dimmed()
        ),
        LiveSample::NoData { timestamp, reason } => format!(
            "[{}] {}  {}",
            timestamp.format("%H:%M:%S"),
            format_temperature(None).dimmed(),
            reason.dimmed()
        ),
        LiveSample::Reading(reading) => {
            let value = format_temperature(Some(reading.value));
            let value = match reading.status {
                Status::Critical => value.red().bold(),
                Status::Warning => value.yellow().bold(),
                _ => value.white().bold(),
            };
            format!(
                "[{}] {}  {}  {}",
                reading.timestamp.format("%H:%M:%S"),
                value,
                status_colored(reading.status),
                reading.source.cyan()
            )
        }
    }
}

/// Log line colored by kind: alerts stand out, system events recede
pub fn format_entry(entry: &LogEntry) -> String {
    let stamp = format!("[{}]", entry.timestamp.format(TIMESTAMP_FORMAT));
    let text = if entry.text.starts_with("ALERT CRITICAL") {
        entry.text.red().bold()
    } else if entry.text.starts_with("ALERT") {
        entry.text.yellow().bold()
    } else if entry.is_system_event() {
        entry.text.cyan()
    } else {
        entry.text.normal()
    };
    format!("{} {}", stamp.dimmed(), text)
}

/// Aggregated point as a row with a bar scaled between `floor` and `ceiling`
pub fn format_point(point: &DataPoint, floor: f64, ceiling: f64) -> String {
    let span = ceiling - floor;
    let filled = if span > 0.0 {
        (((point.mean - floor) / span) * BAR_WIDTH as f64).round() as usize
    } else {
        BAR_WIDTH
    };
    let bar = "█".repeat(filled.clamp(1, BAR_WIDTH));
    format!(
        "{}  {:>7}  {} {}",
        format_time(point.bucket_start),
        format_temperature(Some(point.mean)),
        bar.cyan(),
        format!("({} samples)", point.samples).dimmed()
    )
}
