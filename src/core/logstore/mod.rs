//! Append-only, date-partitioned temperature log.
//!
//! One file per calendar date (`temperature_logs_YYYY-MM-DD.logs`) inside a
//! single directory. Lexicographic file order is chronological order.
//! Writes open, append and close the file each time so readers (live tail,
//! export) never contend with a long-held handle.
//!
//! Read paths never fail: missing directories, unreadable files and
//! malformed lines degrade to fewer entries and a diagnostic log message.

mod encoding;
mod entry;
mod tail;

pub use encoding::{decode, ladder};
pub use entry::{LogEntry, SYSTEM_TAG, TIMESTAMP_FORMAT, UNIT_MARKER};
pub use tail::LiveTail;

use chrono::{Days, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;

pub const DEFAULT_LOG_DIR: &str = "Daily logs";
const FILE_PREFIX: &str = "temperature_logs_";
const FILE_EXTENSION: &str = ".logs";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shared handle to the on-disk log. Construct once and pass `Arc<LogStore>`
/// to every producer and reader.
#[derive(Debug)]
pub struct LogStore {
    dir: PathBuf,
    // One lock per daily file; appends to the same file are serialized
    file_locks: Mutex<HashMap<NaiveDate, Arc<Mutex<()>>>>,
}

impl LogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name holding the entries for `date`
    pub fn file_name_for(date: NaiveDate) -> String {
        format!("{}{}{}", FILE_PREFIX, date.format(DATE_FORMAT), FILE_EXTENSION)
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(Self::file_name_for(date))
    }

    /// Append `entry` to the file of its calendar date, creating the
    /// directory and file when absent.
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let date = entry.timestamp.date();
        let lock = {
            let mut locks = self.file_locks.lock();
            locks.entry(date).or_default().clone()
        };
        let _guard = lock.lock();

        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(date))?;

        let mut line = entry.to_line();
        line.push('\n');
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Append, logging instead of returning failures. For producers that
    /// must keep running whatever the disk does.
    pub fn append_or_log(&self, entry: &LogEntry) {
        if let Err(e) = self.append(entry) {
            log::error!("Failed to write log entry to {}: {}", self.dir.display(), e);
        }
    }

    /// Daily log files currently on disk, in chronological order
    pub fn log_files(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    log::warn!("Log directory '{}' not found", self.dir.display());
                } else {
                    log::error!("Cannot list log directory '{}': {}", self.dir.display(), e);
                }
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(is_log_file_name)
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    }

    /// Every entry of every daily file, in append order.
    pub fn read_all(&self) -> Vec<LogEntry> {
        let files = self.log_files();
        if files.is_empty() {
            log::info!("No log files found in '{}'", self.dir.display());
        }

        let entries: Vec<LogEntry> = files.iter().flat_map(|path| read_log_file(path)).collect();
        log::debug!("Total log entries loaded: {}", entries.len());
        entries
    }

    /// Entries with `start <= timestamp <= end`, reading only the files of
    /// the calendar dates the range spans.
    pub fn read_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<LogEntry> {
        if start > end {
            log::warn!("Empty time range: {} is after {}", start, end);
            return Vec::new();
        }
        if !self.dir.is_dir() {
            log::warn!("Log directory '{}' not found", self.dir.display());
            return Vec::new();
        }

        let mut entries = Vec::new();
        let mut date = start.date();
        let last = end.date();
        while date <= last {
            let path = self.path_for(date);
            if path.is_file() {
                entries.extend(
                    read_log_file(&path)
                        .into_iter()
                        .filter(|e| e.timestamp >= start && e.timestamp <= end),
                );
            } else {
                log::debug!("No log file for date {}", date);
            }
            date = match date.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }

        log::debug!(
            "Found {} log entries between {} and {}",
            entries.len(),
            start,
            end
        );
        entries
    }

    /// Entries appended since `cursor` entries were last seen, plus the
    /// cursor to pass next time.
    ///
    /// A cursor past the end (files removed underneath us) resyncs to the
    /// current count without replaying anything.
    pub fn read_since_cursor(&self, cursor: usize) -> (Vec<LogEntry>, usize) {
        let all = self.read_all();
        let total = all.len();
        if cursor >= total {
            return (Vec::new(), total);
        }
        (all.into_iter().skip(cursor).collect(), total)
    }
}

fn is_log_file_name(name: &str) -> bool {
    name.strip_prefix(FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(FILE_EXTENSION))
        .map(|date| NaiveDate::parse_from_str(date, DATE_FORMAT).is_ok())
        .unwrap_or(false)
}

/// Decode and parse one daily file. Unreadable files yield nothing.
fn read_log_file(path: &Path) -> Vec<LogEntry> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Error reading {}: {}", name, e);
            return Vec::new();
        }
    };

    let Some((text, encoding)) = decode(&bytes) else {
        log::error!("All encoding attempts failed for {}", name);
        return Vec::new();
    };
    if encoding != encoding_rs::UTF_8 {
        log::warn!("{} decoded as {}", name, encoding.name());
    }

    let mut skipped = 0usize;
    let entries: Vec<LogEntry> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match LogEntry::parse_line(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Skipping line in {}: {}", name, e);
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        log::warn!("Skipped {} malformed line(s) in {}", skipped, name);
    }
    log::debug!("Read {} entries from {}", entries.len(), name);
    entries
}
