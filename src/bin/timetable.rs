//! Command-line driver.
//!
//! Usage: `timetable <request.json> [--flat | --summary]`
//!
//! Reads a JSON timetable request, runs the GA, and prints the result as
//! JSON: the full report by default, the flat row listing with `--flat`,
//! or occupancy statistics with breakdowns with `--summary`.
//! Log output goes to stderr and is filtered by `RUST_LOG`.

use std::process::ExitCode;

use log::{error, info};
use timetable_ga::ga::GaEngine;
use timetable_ga::models::{ProblemConfig, TimetableRequest};
use timetable_ga::views::ViewBuilder;
use timetable_ga::TimetableError;

enum Output {
    Report,
    Flat,
    Summary,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut path = None;
    let mut output = Output::Report;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--flat" => output = Output::Flat,
            "--summary" => output = Output::Summary,
            _ => path = Some(arg),
        }
    }
    let Some(path) = path else {
        eprintln!("usage: timetable <request.json> [--flat | --summary]");
        return ExitCode::from(2);
    };

    match run(&path, output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, output: Output) -> Result<String, TimetableError> {
    let request = TimetableRequest::from_json_file(path)?;
    let config = ProblemConfig::new(request)?;
    info!("loaded request from {path}");

    let result = GaEngine::new(&config).run();
    let views = ViewBuilder::new(&config);

    let json = match output {
        Output::Report => serde_json::to_string_pretty(&views.report(&result))?,
        Output::Flat => serde_json::to_string_pretty(&views.flat_view(&result.best))?,
        Output::Summary => serde_json::to_string_pretty(&views.summarize(&result.best, true))?,
    };
    Ok(json)
}
