use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;

use crate::core::query::{query, Resolution};
use crate::core::stats::Summary;
use crate::ui::{format_point, format_temperature, format_time};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let (settings, _) = super::load_settings(matches)?;
    let store = super::open_store(matches, &settings);
    let (start, end) = super::parse_range(matches)?;

    let resolution = match matches.get_one::<String>("resolution") {
        Some(value) => value.parse::<Resolution>()?,
        None => Resolution::Auto,
    };

    let result = query(&store, start, end, resolution);
    let summary = Summary::from_points(&result.points);

    if matches.get_flag("json") {
        let output = serde_json::json!({
            "query": result,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Temperature history {} to {} ({} buckets)",
            format_time(start),
            format_time(end),
            result.resolution
        )
        .cyan()
        .bold()
    );
    println!();

    let Some(summary) = summary else {
        println!("{}", "No temperature readings in this range".yellow());
        return Ok(());
    };

    for point in &result.points {
        println!("{}", format_point(point, summary.min, summary.max));
    }

    println!();
    println!("{}", "Summary".white().bold());
    println!("  Current: {}", format_temperature(Some(summary.latest)));
    println!("  Average: {}", format_temperature(Some(summary.mean)));
    println!("  Maximum: {}", format_temperature(Some(summary.max)));
    println!("  Minimum: {}", format_temperature(Some(summary.min)));
    println!("  Readings: {}", summary.count);

    Ok(())
}
