//! The [Tracker] ties a built scenario together: it emits the signal, polls
//! the microphones, estimates the position and points the observer at it.

use crate::geometry::Point3;
use crate::localizer::{Localization, Localizer};
use crate::orientation::{Heading, Observer};
use crate::room::Room;
use crate::scenario::ScenarioError;
use crate::sensor_array::SensorArray;
use crate::signal_source::{Reading, SignalSource};

use log::{info, warn};
use std::fmt;

/// A validated scenario, ready to be run as many times as needed.
#[derive(Debug, Clone)]
pub struct Tracker {
    array: SensorArray,
    localizer: Localizer,
    observer: Observer,
    signal: Point3,
    strength: f64,
}

/// The outcome of one [Tracker::step].
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Where the signal really was
    pub actual: Point3,
    /// How loud it was
    pub strength: f64,
    /// What every active microphone read, in port order
    pub readings: Vec<Reading>,
    /// How far from each microphone the localizer placed the signal
    pub distances: Vec<f64>,
    /// Where the localizer placed the signal
    pub estimate: Localization,
    /// The observer's heading before this step
    pub previous_heading: Heading,
    /// The observer's heading after this step, if the signal was found
    pub heading: Option<Heading>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "-> Audio signal at position {} with strength {} broadcast to {} microphones",
            self.actual,
            self.strength,
            self.readings.len()
        )?;
        write!(
            f,
            "->>> Predicted Signal Location: {}, Actual Signal Location: {}",
            self.estimate, self.actual
        )?;
        if let Some(heading) = self.heading {
            write!(
                f,
                "\n->>> Redirecting camera from orientation {}, to orientation {}",
                self.previous_heading, heading
            )?;
        }
        Ok(())
    }
}

impl Tracker {
    pub(crate) fn new(
        array: SensorArray,
        localizer: Localizer,
        observer: Observer,
        signal: Point3,
        strength: f64,
    ) -> Self {
        Self {
            array,
            localizer,
            observer,
            signal,
            strength,
        }
    }

    /// The room being tracked in.
    pub fn room(&self) -> &Room {
        self.localizer.room()
    }

    /// Where the signal is emitted.
    pub fn signal(&self) -> Point3 {
        self.signal
    }

    /// The observer being pointed at the signal.
    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// The positions of the microphones that are plugged in.
    pub fn microphone_positions(&self) -> Vec<Point3> {
        self.array.positions()
    }

    /// Moves the signal to `to`. Positions outside the room are refused and
    /// `false` is returned.
    pub fn move_signal(&mut self, to: Point3) -> bool {
        if !self.room().contains(&to) {
            warn!("Refusing to move the signal outside the room to {}", to);
            return false;
        }
        self.signal = to;
        true
    }

    /// Emits the signal once, estimates where it came from, and points the
    /// observer at the estimate if there is one.
    pub fn step(&mut self) -> Result<Report, ScenarioError> {
        self.array.broadcast(self.signal, self.strength);
        info!(
            "Audio signal at position {} with strength {} broadcast to all microphones",
            self.signal, self.strength
        );

        let estimate = self.localizer.locate(&self.array, self.strength)?;
        let readings = self.array.poll_signals();
        let distances = self.localizer.estimate_distances(&readings, self.strength)?;

        let previous_heading = self.observer.heading();
        let heading = match estimate {
            Localization::Found(p) => Some(self.observer.reorient(p)?),
            Localization::NotFound { lower, upper } => {
                warn!(
                    "Neither {} nor {} is inside the room, observer left as is",
                    lower, upper
                );
                None
            }
        };

        Ok(Report {
            actual: self.signal,
            strength: self.strength,
            readings,
            distances,
            estimate,
            previous_heading,
            heading,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance;
    use crate::scenario::{Scenario, DEFAULT_CAPACITY};

    #[test]
    fn follows_a_moving_signal() {
        let mut tracker = Scenario::default().build(DEFAULT_CAPACITY).unwrap();
        let first = tracker.step().unwrap();
        assert!(distance(first.estimate.position().unwrap(), first.actual) < 0.01);

        let there = Point3::new(2.0, 8.0, 1.0);
        assert!(tracker.move_signal(there));
        let second = tracker.step().unwrap();
        assert!(distance(second.estimate.position().unwrap(), there) < 0.01);
        assert_eq!(second.previous_heading, first.heading.unwrap());
        assert_eq!(tracker.observer().heading(), second.heading.unwrap());
    }

    #[test]
    fn signal_cannot_leave_the_room() {
        let mut tracker = Scenario::default().build(DEFAULT_CAPACITY).unwrap();
        assert!(!tracker.move_signal(Point3::new(11.0, 6.0, 2.0)));
        assert_eq!(tracker.signal(), Point3::new(6.0, 6.0, 2.0));
    }

    #[test]
    fn distances_match_true_distances() {
        let mut tracker = Scenario::default().build(DEFAULT_CAPACITY).unwrap();
        let report = tracker.step().unwrap();
        for (mic, d) in tracker.microphone_positions().iter().zip(&report.distances) {
            assert!((distance(*mic, report.actual) - d).abs() < 1e-9);
        }
    }

    #[test]
    fn report_prints_both_locations() {
        let report = Scenario::default().run(DEFAULT_CAPACITY).unwrap();
        let text = report.to_string();
        assert!(text.contains("Predicted Signal Location: (6.00, 6.00, 2.00)"));
        assert!(text.contains("Actual Signal Location: (6.00, 6.00, 2.00)"));
        assert!(text.contains("Redirecting camera"));
    }
}
