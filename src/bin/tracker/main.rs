//! Runs a single scenario and prints where the signal was estimated to be.

use clap::Parser;
use log::info;
use signal_tracker::{
    args::{CommandTask, TrackerArgs},
    scenario::{Scenario, ScenarioError},
};
use std::process::ExitCode;

// Example:
// cargo run --bin tracker -- run
//                            --room        "10, 10, 5"
//                            --sensitivity 10
//                            --signal      "6, 6, 2"
//                            --strength    3
//                            --grid        "3, 3"
//                            --offset      5
//                            --height      5
//                            --camera      "0, 0, 2"

fn main() -> ExitCode {
    env_logger::init();
    let args = TrackerArgs::parse();

    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: TrackerArgs) -> Result<(), ScenarioError> {
    let scenario = match args.command {
        CommandTask::Run(cmd) => Scenario::from(cmd),
        CommandTask::Load(cmd) => {
            info!("Reading scenario from {}", cmd.path);
            Scenario::from_path(&cmd.path)?
        }
        CommandTask::Template(cmd) => {
            Scenario::default().to_path(&cmd.outfile)?;
            println!("-> Default scenario written to {}", cmd.outfile);
            return Ok(());
        }
    };

    let report = scenario.run(args.capacity)?;
    println!("{}", report);
    Ok(())
}
