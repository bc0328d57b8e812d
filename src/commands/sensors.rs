use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;

use crate::core::monitor::{classify, PrioritySelector, SensorCategory, SourceSelector};
use crate::platform::{ComponentSensors, SensorSource, StaticSensors};
use crate::ui::{format_temperature, status_colored};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let (settings, _) = super::load_settings(matches)?;

    let mut sensors: Box<dyn SensorSource> = if matches.get_flag("simulate") {
        Box::new(StaticSensors::simulated())
    } else {
        Box::new(ComponentSensors::new())
    };
    let candidates = sensors.candidates()?;

    if candidates.is_empty() {
        println!("{}", "No temperature sensors detected".yellow());
        return Ok(());
    }

    println!("{}", "Detected sensors".white().bold());
    for category in SensorCategory::PRIORITY {
        let members: Vec<_> = candidates.iter().filter(|c| c.category == category).collect();
        if members.is_empty() {
            continue;
        }
        println!("  {}", category.name().cyan().bold());
        for candidate in members {
            println!(
                "    {:<32} {:>8}  {}",
                candidate.label,
                format_temperature(Some(candidate.value)),
                candidate.group_key.dimmed()
            );
        }
    }
    println!();

    let selector = PrioritySelector::new(settings.calibration());
    match selector.select(&candidates) {
        Ok(selection) => {
            let value = settings.adjustment().apply(selection.value);
            let status = classify(Some(value), &settings.thresholds());
            println!(
                "{} {} {} [{}]",
                "Selected source:".white().bold(),
                selection.source.cyan(),
                format_temperature(Some(value)),
                status_colored(status)
            );
        }
        Err(e) => println!("{}", format!("No usable reading: {}", e).yellow()),
    }

    Ok(())
}
