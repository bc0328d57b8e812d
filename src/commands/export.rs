use anyhow::{Context, Result};
use chrono::Local;
use clap::ArgMatches;
use std::fs;
use std::path::PathBuf;

use crate::core::export::{export, export_file_name, ExportMeta};
use crate::ui::{success, warn};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let (settings, _) = super::load_settings(matches)?;
    let store = super::open_store(matches, &settings);
    let (start, end) = super::parse_range(matches)?;

    let entries = store.read_range(start, end);
    if entries.is_empty() {
        warn("No log entries in the selected range; exporting header only");
    }

    let meta = ExportMeta::new(start, end, Local::now().naive_local());
    let output = match matches.get_one::<String>("output") {
        Some(path) => PathBuf::from(path),
        None => dirs::download_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(export_file_name(start, end)),
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }
    fs::write(&output, export(&entries, &meta))
        .with_context(|| format!("Failed to write export file: {:?}", output))?;

    success(&format!(
        "Exported {} entries to {}",
        entries.len(),
        output.display()
    ));
    Ok(())
}
