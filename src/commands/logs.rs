use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::core::logstore::LiveTail;
use crate::ui::{dimmed, format_entry};

const FOLLOW_INTERVAL: Duration = Duration::from_secs(1);

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let (settings, _) = super::load_settings(matches)?;
    let store = Arc::new(super::open_store(matches, &settings));
    let follow = matches.get_flag("follow");

    let mut tail = LiveTail::from_start(store.clone());
    let history = tail.poll();
    if history.is_empty() {
        println!(
            "{}",
            format!("No log entries found in {}", store.dir().display()).yellow()
        );
    }
    for entry in &history {
        println!("{}", format_entry(entry));
    }

    if !follow {
        return Ok(());
    }

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || running_clone.store(false, Ordering::Relaxed))
        .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    dimmed("Following new entries, press Ctrl+C to stop");
    while running.load(Ordering::Relaxed) {
        std::thread::sleep(FOLLOW_INTERVAL);
        for entry in tail.poll() {
            println!("{}", format_entry(&entry));
        }
    }

    Ok(())
}
