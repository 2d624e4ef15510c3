//! A [Scenario] describes one localization run: the room, the microphone
//! grid, the signal and the observer. Scenarios can come from the command
//! line or from a file. Files hold a single [ron] encoded [Scenario], which
//! with the default values looks like this:
//!
//! ```text
//! (
//!     room: (x: 10.0, y: 10.0, z: 5.0),
//!     sensitivity: 10.0,
//!     signal: (x: 6.0, y: 6.0, z: 2.0),
//!     strength: 3.0,
//!     grid: (rows: 3, columns: 3, spacing: 5.0, height: 5.0),
//!     camera: (x: 0.0, y: 0.0, z: 2.0),
//! )
//! ```
//!
//! Nothing is checked when a scenario is read. [Scenario::build] does all of
//! the validation before any estimation happens.

use crate::geometry::{GeometryError, Point3};
use crate::localizer::{Localizer, LocalizerError};
use crate::microphone::{grid_positions, Microphone};
use crate::orientation::Observer;
use crate::room::{Room, RoomError};
use crate::sensor_array::SensorArray;
use crate::tracker::{Report, Tracker};

use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    fmt,
    fs::File,
    io::{Read, Write},
    path::Path,
};

/// Number of ports on the simulated sensor board unless told otherwise.
pub const DEFAULT_CAPACITY: usize = 99;

/// A regular grid of microphones, all at the same height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicGrid {
    /// Microphones along x
    pub rows: i64,
    /// Microphones along y
    pub columns: i64,
    /// Distance between neighbouring microphones
    pub spacing: f64,
    /// z coordinate of every microphone
    pub height: f64,
}

impl MicGrid {
    /// Whether the whole grid lies inside `room`, judged from its far corner
    /// without laying out any position. An empty grid always fits.
    pub fn fits_in(&self, room: &Room) -> bool {
        if self.rows <= 0 || self.columns <= 0 {
            return true;
        }
        let reach = |count: i64| (count - 1) as f64 * self.spacing;
        (0.0..=room.x()).contains(&reach(self.rows))
            && (0.0..=room.y()).contains(&reach(self.columns))
            && (0.0..=room.z()).contains(&self.height)
    }
}

/// Everything needed for a localization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Far corner of the room, the near corner being the origin
    pub room: Point3,
    /// Sensitivity of every microphone
    pub sensitivity: f64,
    /// Where the signal is emitted
    pub signal: Point3,
    /// How loud the signal is
    pub strength: f64,
    /// Layout of the microphones
    pub grid: MicGrid,
    /// Where the observer sits
    pub camera: Point3,
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario {
            room: Point3::new(10.0, 10.0, 5.0),
            sensitivity: 10.0,
            signal: Point3::new(6.0, 6.0, 2.0),
            strength: 3.0,
            grid: MicGrid {
                rows: 3,
                columns: 3,
                spacing: 5.0,
                height: 5.0,
            },
            camera: Point3::new(0.0, 0.0, 2.0),
        }
    }
}

/// Things that can stop a scenario from being read, written, or run.
#[derive(Debug)]
pub enum ScenarioError {
    /// A parameter that has to be non-negative is negative.
    NegativeValue {
        /// Which parameter
        field: &'static str,
        /// What it was
        value: f64,
    },

    /// A parameter is NaN or infinite.
    NonFinite {
        /// Which parameter
        field: &'static str,
        /// What it was
        value: f64,
    },

    /// Something that has to be inside the room is not.
    OutOfBounds(&'static str),

    /// The room could not be built.
    Room(RoomError),

    /// The localizer gave up.
    Localizer(LocalizerError),

    /// The observer could not be pointed at the estimate.
    Geometry(GeometryError),

    /// Returned when io fails when reading or writing scenario files.
    IoError(std::io::Error),

    /// Returned when serialization of a scenario fails.
    RonError(ron::Error),

    /// Returned when deserialization of a scenario fails.
    RonSpannedError(ron::de::SpannedError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ScenarioError as SE;
        let msg = match self {
            SE::NegativeValue { field, value } => Cow::from(format!(
                "please ensure no negative values are used: {} is {}",
                field, value
            )),
            SE::NonFinite { field, value } => {
                Cow::from(format!("{} must be a finite number, got {}", field, value))
            }
            SE::OutOfBounds(what) => Cow::from(format!(
                "{} fell outside the boundaries of the room, please re-enter data",
                what
            )),
            SE::Room(error) => Cow::from(format!("{}", error)),
            SE::Localizer(error) => Cow::from(format!("{}", error)),
            SE::Geometry(error) => Cow::from(format!("cannot reorient observer: {}", error)),
            SE::IoError(error) => Cow::from(format!("io error: {}", error)),
            SE::RonError(error) => Cow::from(format!("ron error: {}", error)),
            SE::RonSpannedError(error) => Cow::from(format!("ron spanning error: {}", error)),
        };

        write!(f, "{}", msg)
    }
}

impl std::error::Error for ScenarioError {}

impl From<RoomError> for ScenarioError {
    fn from(value: RoomError) -> Self {
        Self::Room(value)
    }
}

impl From<LocalizerError> for ScenarioError {
    fn from(value: LocalizerError) -> Self {
        Self::Localizer(value)
    }
}

impl From<GeometryError> for ScenarioError {
    fn from(value: GeometryError) -> Self {
        Self::Geometry(value)
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}

impl Scenario {
    /// Write out a [Scenario] to the path provided.
    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<(), ScenarioError> {
        let mut handle = File::create(path)?;
        self.to_writer(&mut handle)
    }

    /// Write out a [Scenario] to the [Write]able object provided.
    pub fn to_writer(&self, writer: &mut impl Write) -> Result<(), ScenarioError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(ScenarioError::RonError)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Read a [Scenario] from the path provided.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let mut handle = File::open(path)?;
        Self::from_reader(&mut handle)
    }

    /// Read a [Scenario] from the [Read]able object provided.
    pub fn from_reader(reader: &mut impl Read) -> Result<Self, ScenarioError> {
        let mut raw_text = Vec::new();
        reader.read_to_end(&mut raw_text)?;
        ron::de::from_bytes(&raw_text).map_err(ScenarioError::RonSpannedError)
    }

    fn scalar_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("room x", self.room.x),
            ("room y", self.room.y),
            ("room z", self.room.z),
            ("microphone sensitivity", self.sensitivity),
            ("signal x", self.signal.x),
            ("signal y", self.signal.y),
            ("signal z", self.signal.z),
            ("signal strength", self.strength),
            ("grid rows", self.grid.rows as f64),
            ("grid columns", self.grid.columns as f64),
            ("grid offset", self.grid.spacing),
            ("grid height", self.grid.height),
            ("camera x", self.camera.x),
            ("camera y", self.camera.y),
            ("camera z", self.camera.z),
        ]
    }

    /// Checks that no parameter is negative or non-finite.
    pub fn check_values(&self) -> Result<(), ScenarioError> {
        for (field, value) in self.scalar_fields() {
            if !value.is_finite() {
                return Err(ScenarioError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(ScenarioError::NegativeValue { field, value });
            }
        }
        Ok(())
    }

    /// Validates the scenario and sets up everything needed to run it, with
    /// a sensor board of `capacity` ports.
    pub fn build(&self, capacity: usize) -> Result<Tracker, ScenarioError> {
        self.check_values()?;

        let room = Room::new(self.room.x, self.room.y, self.room.z)?;

        if !self.grid.fits_in(&room) {
            return Err(ScenarioError::OutOfBounds("some microphones"));
        }
        let positions = grid_positions(
            self.grid.rows as usize,
            self.grid.columns as usize,
            self.grid.spacing,
            self.grid.height,
        );
        if !room.contains_all(&positions) {
            return Err(ScenarioError::OutOfBounds("some microphones"));
        }
        if !room.contains(&self.camera) {
            return Err(ScenarioError::OutOfBounds("the camera"));
        }
        if !room.contains(&self.signal) {
            return Err(ScenarioError::OutOfBounds("the signal"));
        }

        let microphones = positions
            .iter()
            .map(|&p| Microphone::new(p, self.sensitivity))
            .collect();
        let array = SensorArray::new(capacity, microphones);

        let mut localizer = Localizer::new(room);
        localizer.set_sensitivity(self.sensitivity);
        localizer.set_mic_positions(positions);

        Ok(Tracker::new(
            array,
            localizer,
            Observer::new(self.camera),
            self.signal,
            self.strength,
        ))
    }

    /// Validates and runs the scenario once.
    pub fn run(&self, capacity: usize) -> Result<Report, ScenarioError> {
        self.build(capacity)?.step()
    }
}
