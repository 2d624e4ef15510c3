//! Commandline argument parser using clap for SignalTracker

use crate::geometry::Point3;
use crate::parse::{parse_int_pair, parse_point};
use crate::scenario::{MicGrid, Scenario, DEFAULT_CAPACITY};

use clap::{Args, Parser, Subcommand};

/// Locate an audio signal in a room from the volumes its microphones hear
#[derive(Debug, Parser, Clone)]
#[command(version, about, long_about = None)]
pub struct TrackerArgs {
    #[command(subcommand)]
    /// Where the scenario comes from
    pub command: CommandTask,

    /// Number of ports on the sensor board. Extra microphones are dropped
    #[arg(short = 'c', long = "capacity", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,
}

/// The tasks the tracker can perform.
#[derive(Debug, Subcommand, Clone)]
pub enum CommandTask {
    /// Run a scenario described on the command line
    Run(RunCommand),

    /// Run a scenario stored in a RON file
    Load(LoadCommand),

    /// Write the default scenario to a RON file, as a starting point
    Template(TemplateCommand),
}

/// Every parameter of a scenario. Lists are comma separated, e.g. "10, 10, 5".
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Room dimensions (float, float, float)
    #[arg(long = "room", value_parser = parse_point, allow_hyphen_values = true, default_value = "10, 10, 5")]
    pub room: Point3,

    /// Microphone sensitivity (float)
    #[arg(short = 's', long = "sensitivity", allow_negative_numbers = true, default_value_t = 10.0)]
    pub sensitivity: f64,

    /// Signal position (float, float, float)
    #[arg(long = "signal", value_parser = parse_point, allow_hyphen_values = true, default_value = "6, 6, 2")]
    pub signal: Point3,

    /// Signal strength (float)
    #[arg(short = 'S', long = "strength", allow_negative_numbers = true, default_value_t = 3.0)]
    pub strength: f64,

    /// Mic grid dimensions (int, int)
    #[arg(short = 'g', long = "grid", value_parser = parse_int_pair, allow_hyphen_values = true, default_value = "3, 3")]
    pub grid: (i64, i64),

    /// Mic grid offset (float)
    #[arg(short = 'o', long = "offset", allow_negative_numbers = true, default_value_t = 5.0)]
    pub offset: f64,

    /// Mic grid height (float)
    #[arg(short = 'z', long = "height", allow_negative_numbers = true, default_value_t = 5.0)]
    pub height: f64,

    /// Camera position (float, float, float)
    #[arg(long = "camera", value_parser = parse_point, allow_hyphen_values = true, default_value = "0, 0, 2")]
    pub camera: Point3,
}

impl From<RunCommand> for Scenario {
    fn from(cmd: RunCommand) -> Self {
        Scenario {
            room: cmd.room,
            sensitivity: cmd.sensitivity,
            signal: cmd.signal,
            strength: cmd.strength,
            grid: MicGrid {
                rows: cmd.grid.0,
                columns: cmd.grid.1,
                spacing: cmd.offset,
                height: cmd.height,
            },
            camera: cmd.camera,
        }
    }
}

/// Run a scenario from a file.
#[derive(Debug, Args, Clone)]
pub struct LoadCommand {
    /// Filename of the scenario to read
    #[arg(short = 'p', long = "path")]
    pub path: String,
}

/// Write out the default scenario.
#[derive(Debug, Args, Clone)]
pub struct TemplateCommand {
    /// Filename for the scenario to be written to
    #[arg(short = 'o', long = "out")]
    pub outfile: String,
}

/// Watch the estimate follow the signal as it moves around the room
#[derive(Debug, Parser, Clone)]
#[command(version, about, long_about = None)]
pub struct MonitorArgs {
    /// Scenario to start from, the default scenario if not given
    #[arg(short = 'p', long = "path")]
    pub path: Option<String>,

    /// Number of ports on the sensor board. Extra microphones are dropped
    #[arg(short = 'c', long = "capacity", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        TrackerArgs::command().debug_assert();
        MonitorArgs::command().debug_assert();
    }

    #[test]
    fn run_defaults_match_default_scenario() {
        let args = TrackerArgs::try_parse_from(["tracker", "run"]).unwrap();
        assert_eq!(args.capacity, DEFAULT_CAPACITY);
        match args.command {
            CommandTask::Run(cmd) => assert_eq!(Scenario::from(cmd), Scenario::default()),
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn run_with_everything_set() {
        let args = TrackerArgs::try_parse_from([
            "tracker",
            "--capacity",
            "12",
            "run",
            "--room",
            "8,8,4",
            "--sensitivity",
            "2",
            "--signal",
            "3, 5, 1",
            "--strength",
            "7",
            "--grid",
            "3,2",
            "--offset",
            "4",
            "--height",
            "4",
            "--camera",
            "8, 0, 1",
        ])
        .unwrap();
        assert_eq!(args.capacity, 12);
        let CommandTask::Run(cmd) = args.command else {
            panic!("expected run");
        };
        let scenario = Scenario::from(cmd);
        assert_eq!(scenario.room, Point3::new(8.0, 8.0, 4.0));
        assert_eq!(scenario.signal, Point3::new(3.0, 5.0, 1.0));
        assert_eq!(scenario.grid.rows, 3);
        assert_eq!(scenario.grid.columns, 2);
        assert_eq!(scenario.grid.spacing, 4.0);
        assert_eq!(scenario.camera, Point3::new(8.0, 0.0, 1.0));
    }

    #[test]
    fn malformed_list_is_rejected() {
        assert!(TrackerArgs::try_parse_from(["tracker", "run", "--room", "10, 10"]).is_err());
        assert!(TrackerArgs::try_parse_from(["tracker", "run", "--grid", "3"]).is_err());
    }

    #[test]
    fn negative_grid_reaches_validation() {
        let args = TrackerArgs::try_parse_from(["tracker", "run", "--grid=-3,3"]).unwrap();
        let CommandTask::Run(cmd) = args.command else {
            panic!("expected run");
        };
        assert_eq!(cmd.grid, (-3, 3));
    }

    #[test]
    fn negative_numbers_reach_validation() {
        let args =
            TrackerArgs::try_parse_from(["tracker", "run", "--strength", "-3", "--signal", "-1, 2, 3"])
                .unwrap();
        let CommandTask::Run(cmd) = args.command else {
            panic!("expected run");
        };
        assert_eq!(cmd.strength, -3.0);
        assert_eq!(cmd.signal, Point3::new(-1.0, 2.0, 3.0));
    }

    #[test]
    fn load_and_template() {
        let args = TrackerArgs::try_parse_from(["tracker", "load", "-p", "x.ron"]).unwrap();
        assert!(matches!(args.command, CommandTask::Load(LoadCommand { path }) if path == "x.ron"));

        let args = TrackerArgs::try_parse_from(["tracker", "template", "--out", "y.ron"]).unwrap();
        assert!(
            matches!(args.command, CommandTask::Template(TemplateCommand { outfile }) if outfile == "y.ron")
        );
    }
}
