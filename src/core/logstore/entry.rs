use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::monitor::Reading;
use crate::error::{Result, ThermologError};

/// Fixed-width timestamp written between the leading brackets of every line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_WIDTH: usize = 19;

/// Marker that must directly follow a logged temperature value
pub const UNIT_MARKER: &str = "°C";

/// Leading tag of every system event line
pub const SYSTEM_TAG: &str = "[SYSTEM]";

/// One persisted log line: `[YYYY-MM-DD HH:MM:SS] <text>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub text: String,
}

impl LogEntry {
    pub fn new(timestamp: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }

    pub fn reading(reading: &Reading) -> Self {
        Self::new(reading.timestamp, reading.log_text())
    }

    /// System events (startup, settings changes, delivery failures, ...)
    pub fn system_event(timestamp: NaiveDateTime, event: &str, detail: &str) -> Self {
        Self::new(timestamp, format!("{} {}: {}", SYSTEM_TAG, event, detail))
    }

    pub fn is_system_event(&self) -> bool {
        self.text.starts_with(SYSTEM_TAG)
    }

    /// Render as a single line, without the trailing newline.
    pub fn to_line(&self) -> String {
        let text: String = self
            .text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        format!("[{}] {}", self.timestamp.format(TIMESTAMP_FORMAT), text)
    }

    /// Parse a stored line. Anything but a strict leading timestamp is a
    /// parse failure; callers skip such lines.
    pub fn parse_line(line: &str) -> Result<Self> {
        let rest = line
            .strip_prefix('[')
            .ok_or_else(|| ThermologError::parse(format!("missing '[' in line: {}", line)))?;

        let stamp = rest
            .get(..TIMESTAMP_WIDTH)
            .ok_or_else(|| ThermologError::parse(format!("truncated timestamp: {}", line)))?;
        let after = &rest[TIMESTAMP_WIDTH..];
        let text = after
            .strip_prefix(']')
            .ok_or_else(|| ThermologError::parse(format!("missing ']' in line: {}", line)))?;

        let timestamp = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|e| ThermologError::parse(format!("bad timestamp '{}': {}", stamp, e)))?;

        Ok(Self {
            timestamp,
            text: text.strip_prefix(' ').unwrap_or(text).to_string(),
        })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
