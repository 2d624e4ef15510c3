mod gui;

use clap::Parser;
use gui::engage_gui;
use signal_tracker::{
    args::MonitorArgs,
    gui::MonitorError,
    scenario::Scenario,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    // No logger: stderr would be drawn over the alternate screen.
    let args = MonitorArgs::parse();

    match monitor(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn monitor(args: MonitorArgs) -> Result<(), MonitorError> {
    let scenario = match args.path {
        Some(path) => Scenario::from_path(path)?,
        None => Scenario::default(),
    };
    let tracker = scenario.build(args.capacity)?;
    engage_gui(tracker)
}
