use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use thermolog::commands;

/// Range selection shared by `query` and `export`
fn range_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("from")
                .long("from")
                .value_name("TIMESTAMP")
                .help("Range start (YYYY-MM-DD [HH:MM[:SS]])"),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_name("TIMESTAMP")
                .help("Range end, defaults to now; a bare date covers the whole day"),
        )
        .arg(
            Arg::new("last-hours")
                .long("last-hours")
                .value_name("N")
                .help("The last N hours")
                .value_parser(clap::value_parser!(u64).range(1..))
                .conflicts_with_all(["from", "to", "today", "yesterday"]),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .help("From midnight until now")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["from", "to", "yesterday"]),
        )
        .arg(
            Arg::new("yesterday")
                .long("yesterday")
                .help("The whole previous day")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["from", "to"]),
        )
}

fn simulate_arg() -> Arg {
    Arg::new("simulate")
        .long("simulate")
        .help("Use a fixed set of simulated sensors")
        .action(ArgAction::SetTrue)
}

fn cli() -> Command {
    Command::new("thermolog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Temperature monitor with daily logs, alerts and history queries")
        .arg(
            Arg::new("settings")
                .long("settings")
                .value_name("FILE")
                .help("Settings file (defaults to the user config directory)")
                .global(true),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .help("Directory holding the daily log files")
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Start live temperature monitoring")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECS")
                        .help("Polling interval in seconds (1-300)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(simulate_arg()),
        )
        .subcommand(
            Command::new("logs")
                .about("Print the temperature log")
                .arg(
                    Arg::new("follow")
                        .short('f')
                        .long("follow")
                        .help("Keep printing new entries as they are logged")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(range_args(
            Command::new("query")
                .about("Show aggregated temperature history for a time range")
                .arg(
                    Arg::new("resolution")
                        .short('r')
                        .long("resolution")
                        .value_name("RES")
                        .help("Bucket size: auto, 10m, 30m, 1h, 1d or raw"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output as JSON")
                        .action(ArgAction::SetTrue),
                ),
        ))
        .subcommand(range_args(
            Command::new("export")
                .about("Export log entries for a time range to a file")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Output file (defaults to the Downloads folder)"),
                ),
        ))
        .subcommand(
            Command::new("settings")
                .about("Show or change settings (use 'thermolog settings --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show current settings"))
                .subcommand(
                    Command::new("thresholds")
                        .about("Set warning and critical thresholds")
                        .arg(
                            Arg::new("warning")
                                .help("Warning threshold in °C")
                                .required(true)
                                .index(1)
                                .allow_negative_numbers(true)
                                .value_parser(clap::value_parser!(f64)),
                        )
                        .arg(
                            Arg::new("critical")
                                .help("Critical threshold in °C, above the warning threshold")
                                .required(true)
                                .index(2)
                                .allow_negative_numbers(true)
                                .value_parser(clap::value_parser!(f64)),
                        ),
                )
                .subcommand(
                    Command::new("offset")
                        .about("Set the temperature adjustment offset")
                        .arg(
                            Arg::new("offset")
                                .help("Signed offset in °C")
                                .required(true)
                                .index(1)
                                .allow_negative_numbers(true)
                                .value_parser(clap::value_parser!(f64)),
                        )
                        .arg(
                            Arg::new("enable")
                                .long("enable")
                                .help("Apply the offset to readings")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("disable"),
                        )
                        .arg(
                            Arg::new("disable")
                                .long("disable")
                                .help("Keep the offset but stop applying it")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_name("DEGREES")
                                .help("Reject offsets beyond ±DEGREES")
                                .value_parser(clap::value_parser!(f64)),
                        ),
                )
                .subcommand(
                    Command::new("interval")
                        .about("Set the polling interval")
                        .arg(
                            Arg::new("seconds")
                                .help("Interval in seconds (1-300)")
                                .required(true)
                                .index(1)
                                .value_parser(clap::value_parser!(u64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("sensors")
                .about("List detected temperature sensors and the selected source")
                .arg(simulate_arg()),
        )
}

fn main() -> Result<()> {
    thermolog::init_logging();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run::execute(sub_matches)?,
        Some(("logs", sub_matches)) => commands::logs::execute(sub_matches)?,
        Some(("query", sub_matches)) => commands::query::execute(sub_matches)?,
        Some(("export", sub_matches)) => commands::export::execute(sub_matches)?,
        Some(("settings", sub_matches)) => commands::settings::execute(sub_matches)?,
        Some(("sensors", sub_matches)) => commands::sensors::execute(sub_matches)?,
        _ => {
            println!("Welcome to thermolog!");
            println!("Use 'thermolog --help' for more information.");
        }
    }

    Ok(())
}
