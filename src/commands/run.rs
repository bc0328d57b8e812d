//! Live monitor command handler.

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::core::monitor::{ConsoleNotifier, LogMailer, MonitorRuntime};
use crate::platform::{device_name, ComponentSensors, SensorSource, StaticSensors};
use crate::ui::{dimmed, format_sample};

/// How often the foreground loop checks for a new sample
const DISPLAY_POLL: Duration = Duration::from_millis(200);

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let (mut settings, _) = super::load_settings(matches)?;
    if let Some(&secs) = matches.get_one::<u64>("interval") {
        settings.set_refresh_interval(secs)?;
    }
    let store = Arc::new(super::open_store(matches, &settings));

    let simulate = matches.get_flag("simulate");
    let sensors: Box<dyn SensorSource> = if simulate {
        Box::new(StaticSensors::simulated())
    } else {
        Box::new(ComponentSensors::new())
    };

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("{}", "Stopping monitor...".yellow().bold());
        running_clone.store(false, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let thresholds = settings.thresholds();
    let interval = settings.refresh_interval();
    let runtime = MonitorRuntime::start(
        settings,
        store.clone(),
        sensors,
        Arc::new(ConsoleNotifier),
        Arc::new(LogMailer::new(device_name())),
    )
    .context("Failed to start temperature monitor")?;

    println!("{}", "Temperature monitor running".cyan().bold());
    if simulate {
        println!("{}", "Using simulated sensors".yellow());
    }
    dimmed(&format!(
        "Warning at {:.1}°C, critical at {:.1}°C, polling every {}s",
        thresholds.warning(),
        thresholds.critical(),
        interval.as_secs()
    ));
    dimmed(&format!("Logging to {}", store.dir().display()));
    dimmed("Press Ctrl+C to stop");
    println!();

    let mut sample_rx = runtime.sample_rx.clone();
    while running.load(Ordering::Relaxed) {
        if sample_rx.has_changed().unwrap_or(false) {
            let sample = sample_rx.borrow_and_update().clone();
            println!("{}", format_sample(&sample));
        }
        std::thread::sleep(DISPLAY_POLL);
    }

    runtime.shutdown();
    println!("{}", "Monitor stopped".green());
    Ok(())
}
