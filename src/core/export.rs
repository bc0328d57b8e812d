//! Plain-text export of a set of log entries.

use chrono::NaiveDateTime;

use crate::core::logstore::LogEntry;

pub const DEFAULT_SOURCE_LABEL: &str = "Storage Temperature Monitor";
const RANGE_FORMAT: &str = "%Y-%m-%d %H:%M";
const EXPORTED_ON_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

/// Header metadata of an export
#[derive(Debug, Clone)]
pub struct ExportMeta {
    pub range_start: NaiveDateTime,
    pub range_end: NaiveDateTime,
    pub exported_at: NaiveDateTime,
    pub source_label: String,
}

impl ExportMeta {
    pub fn new(range_start: NaiveDateTime, range_end: NaiveDateTime, exported_at: NaiveDateTime) -> Self {
        Self {
            range_start,
            range_end,
            exported_at,
            source_label: DEFAULT_SOURCE_LABEL.to_string(),
        }
    }
}

/// Render entries, in the order given, below a `#`-prefixed header.
pub fn export(entries: &[LogEntry], meta: &ExportMeta) -> Vec<u8> {
    let mut out = String::new();
    out.push_str("# Temperature Logs Export\n");
    out.push_str(&format!(
        "# Time Range: {} to {}\n",
        meta.range_start.format(RANGE_FORMAT),
        meta.range_end.format(RANGE_FORMAT)
    ));
    out.push_str(&format!(
        "# Exported on: {}\n",
        meta.exported_at.format(EXPORTED_ON_FORMAT)
    ));
    out.push_str("# Format: [TIMESTAMP] LOG_ENTRY\n");
    out.push_str(&format!("# Entries: {}\n", entries.len()));
    out.push_str(&format!("# Source: {}\n", meta.source_label));
    out.push_str(&"=".repeat(60));
    out.push('\n');

    for entry in entries {
        out.push_str(&entry.to_line());
        out.push('\n');
    }

    out.into_bytes()
}

/// Default file name for an export of `[start, end]`
pub fn export_file_name(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!(
        "temperature_export_{}_to_{}.logs",
        start.format(FILE_STAMP_FORMAT),
        end.format(FILE_STAMP_FORMAT)
    )
}
