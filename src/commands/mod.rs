// Command handlers module
pub mod export;
pub mod logs;
pub mod query;
pub mod run;
pub mod sensors;
pub mod settings;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::ArgMatches;
use std::path::PathBuf;

use crate::core::config::Settings;
use crate::core::logstore::LogStore;

const INPUT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Settings file from `--settings`, or the default location
pub(crate) fn settings_path(matches: &ArgMatches) -> Result<PathBuf> {
    match matches.get_one::<String>("settings") {
        Some(path) => Ok(PathBuf::from(path)),
        None => Settings::default_path(),
    }
}

pub(crate) fn load_settings(matches: &ArgMatches) -> Result<(Settings, PathBuf)> {
    let path = settings_path(matches)?;
    let settings = Settings::load_from(&path)?;
    Ok((settings, path))
}

/// Log store at `--log-dir`, falling back to the configured directory
pub(crate) fn open_store(matches: &ArgMatches, settings: &Settings) -> LogStore {
    let dir = matches
        .get_one::<String>("log-dir")
        .cloned()
        .unwrap_or_else(|| settings.log_dir.clone());
    LogStore::new(dir)
}

/// Parse a user-supplied timestamp. A bare date means midnight, or the last
/// second of the day when `end_of_day` is set.
pub(crate) fn parse_timestamp(input: &str, end_of_day: bool) -> Result<NaiveDateTime> {
    let input = input.trim();
    for format in INPUT_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(ts);
        }
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").with_context(|| {
        format!("Invalid timestamp '{}' (expected YYYY-MM-DD [HH:MM[:SS]])", input)
    })?;
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    };
    time.map(|t| date.and_time(t))
        .context("Invalid time of day")
}

/// Range from `--last-hours`, `--today`, `--yesterday` or `--from`/`--to`.
/// `--to` defaults to now.
pub(crate) fn parse_range(matches: &ArgMatches) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let now = Local::now().naive_local();
    let midnight = now
        .date()
        .and_hms_opt(0, 0, 0)
        .context("Invalid midnight")?;

    let (start, end) = if let Some(&hours) = matches.get_one::<u64>("last-hours") {
        (now - Duration::hours(hours as i64), now)
    } else if matches.get_flag("today") {
        (midnight, now)
    } else if matches.get_flag("yesterday") {
        (midnight - Duration::days(1), midnight - Duration::seconds(1))
    } else {
        let from = matches
            .get_one::<String>("from")
            .context("Specify --from, --last-hours, --today or --yesterday")?;
        let start = parse_timestamp(from, false)?;
        let end = match matches.get_one::<String>("to") {
            Some(to) => parse_timestamp(to, true)?,
            None => now,
        };
        (start, end)
    };

    if start > end {
        bail!("Range start {} is after its end {}", start, end);
    }
    Ok((start, end))
}
