use std::time::{Duration, Instant};

use clap::Parser;

use ratt_gff::cli::Cli;
use ratt_gff::config::RunConfig;
use ratt_gff::{input, report};

fn main() {
    let started = Instant::now();
    let cli = Cli::parse();
    let config = RunConfig::from_cli(&cli);

    report::progress("checking for valid input files...");
    if let Err(error) = input::validate_inputs(&config) {
        eprintln!("ERROR: {:#}", error);
        report::ExitCode::InvalidUsage.exit();
    }
    report::progress("input files are valid");

    if let Err(error) = ratt_gff::run(&config) {
        eprintln!("{}", report::fatal_banner(&format!("{:#}", error)));
        report::ExitCode::GeneralError.exit();
    }

    // sub-second precision is noise at this scale
    let elapsed = Duration::from_secs(started.elapsed().as_secs());
    println!(
        "\n{} COMPLETE in {}",
        report::TOOL_TAG,
        humantime::format_duration(elapsed)
    );
}
