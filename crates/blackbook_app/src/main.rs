mod cli;
mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use blackbook_logging::{bb_error, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match cli::parse(&args) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("{err}\n\n{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    let log_file = PathBuf::from(DEFAULT_LOG_FILE);
    let (destination, level) = if invocation.verbose {
        (LogDestination::Both(log_file), LevelFilter::Debug)
    } else {
        let level = std::env::var("BLACKBOOK_LOG_LEVEL")
            .map(|raw| blackbook_logging::parse_level(&raw))
            .unwrap_or(LevelFilter::Info);
        (LogDestination::File(log_file), level)
    };
    blackbook_logging::initialize(destination, level);

    match platform::run_app(invocation.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            bb_error!("{}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
