use anyhow::{Context, Result};
use chrono::Local;
use clap::ArgMatches;
use colored::Colorize;
use std::path::Path;

use crate::core::config::Settings;
use crate::core::logstore::LogEntry;
use crate::ui::{format_temperature, success};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(matches),
        Some(("thresholds", sub_matches)) => update(matches, sub_matches, set_thresholds),
        Some(("offset", sub_matches)) => update(matches, sub_matches, set_offset),
        Some(("interval", sub_matches)) => update(matches, sub_matches, set_interval),
        _ => {
            println!("Use 'thermolog settings --help' for more information.");
            Ok(())
        }
    }
}

fn show(matches: &ArgMatches) -> Result<()> {
    let (settings, path) = super::load_settings(matches)?;
    let thresholds = settings.thresholds();
    let adjustment = settings.adjustment();

    println!("{}", "Settings".white().bold());
    println!("  {} {}", "File:".dimmed(), path.display());
    println!();
    println!("  Warning threshold:  {}", format_temperature(Some(thresholds.warning())).yellow());
    println!("  Critical threshold: {}", format_temperature(Some(thresholds.critical())).red());
    println!(
        "  Adjustment:         {:+.1}°C ({})",
        adjustment.offset,
        if adjustment.enabled { "enabled".green() } else { "disabled".dimmed() }
    );
    if let Some(limit) = adjustment.limit {
        println!("  Offset limit:       ±{:.1}°C", limit);
    }
    println!("  Refresh interval:   {}s", settings.refresh_interval_secs);
    println!(
        "  Alerts:             {}",
        if settings.alerts_enabled { "enabled".green() } else { "disabled".dimmed() }
    );
    println!("  Alert cooldown:     {}s", settings.alert_cooldown_secs);
    println!("  Email cooldown:     {}s", settings.email_cooldown_secs);
    println!("  Report interval:    {}s", settings.report_interval_secs);
    println!("  Log directory:      {}", settings.log_dir);

    let calibration = settings.calibration();
    println!(
        "  Calibration:        storage {:+.1}, gpu {:+.1}, cpu {:+.1}, other {:+.1}",
        calibration.storage, calibration.gpu, calibration.cpu, calibration.other
    );
    Ok(())
}

/// Load, apply `change`, save, and record the change in the temperature log.
/// `change` returns the description logged on success.
fn update(
    matches: &ArgMatches,
    sub_matches: &ArgMatches,
    change: fn(&mut Settings, &ArgMatches) -> Result<String>,
) -> Result<()> {
    let (mut settings, path) = super::load_settings(matches)?;
    let description = change(&mut settings, sub_matches)?;
    save(&settings, &path)?;

    let store = super::open_store(matches, &settings);
    store.append_or_log(&LogEntry::system_event(
        Local::now().naive_local(),
        "Settings Update",
        &description,
    ));

    success(&description);
    Ok(())
}

fn save(settings: &Settings, path: &Path) -> Result<()> {
    settings
        .save_to(path)
        .with_context(|| format!("Failed to save settings to {:?}", path))
}

fn set_thresholds(settings: &mut Settings, matches: &ArgMatches) -> Result<String> {
    let warning = *matches
        .get_one::<f64>("warning")
        .context("Warning threshold is required")?;
    let critical = *matches
        .get_one::<f64>("critical")
        .context("Critical threshold is required")?;

    let thresholds = settings.update_thresholds(warning, critical)?;
    Ok(format!(
        "Thresholds updated: Warning={:.1}°C, Critical={:.1}°C",
        thresholds.warning(),
        thresholds.critical()
    ))
}

fn set_offset(settings: &mut Settings, matches: &ArgMatches) -> Result<String> {
    let offset = *matches
        .get_one::<f64>("offset")
        .context("Offset value is required")?;

    let enabled = if matches.get_flag("enable") {
        true
    } else if matches.get_flag("disable") {
        false
    } else {
        settings.adjustment_enabled
    };

    // A new limit applies to the new offset, not the stored one
    if let Some(&limit) = matches.get_one::<f64>("limit") {
        settings.offset_limit = None;
        settings.set_adjustment(offset, enabled)?;
        settings.set_offset_limit(Some(limit))?;
    }

    let adjustment = settings.set_adjustment(offset, enabled)?;
    Ok(format!(
        "Adjustment set to {:+.1}°C ({})",
        adjustment.offset,
        if adjustment.enabled { "enabled" } else { "disabled" }
    ))
}

fn set_interval(settings: &mut Settings, matches: &ArgMatches) -> Result<String> {
    let secs = *matches
        .get_one::<u64>("seconds")
        .context("Interval is required")?;

    settings.set_refresh_interval(secs)?;
    Ok(format!("Refresh interval set to {}s", secs))
}
