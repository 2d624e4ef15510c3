//! A simulated microphone and the helper that lays microphones out on a
//! ceiling grid.

use crate::geometry::{distance, Point3};
use log::{info, warn};

/// A microphone at a fixed position. Every signal it receives overwrites its
/// last reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Microphone {
    position: Point3,
    sensitivity: f64,
    last_volume: f64,
}

impl Microphone {
    /// A silent microphone at `position`. `sensitivity` is in units of
    /// volume per unit distance.
    pub fn new(position: Point3, sensitivity: f64) -> Self {
        Self {
            position,
            sensitivity,
            last_volume: 0.0,
        }
    }

    /// Where the microphone is.
    pub fn position(&self) -> Point3 {
        self.position
    }

    /// The sensitivity the microphone was built with.
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// The volume registered by the most recent signal, zero if none yet.
    pub fn volume(&self) -> f64 {
        self.last_volume
    }

    /// Registers a signal of `strength` emitted at `source`, attenuated by the
    /// inverse of the distance travelled. A source sitting on the microphone
    /// clips the sensor, and the previous reading is kept.
    pub fn receive(&mut self, source: Point3, strength: f64) {
        let dist = distance(self.position, source);
        if dist <= 0.0 {
            warn!(
                "Signal occurred inside microphone at {}, sensor clipping, reading unchanged",
                self.position
            );
            return;
        }
        self.last_volume = strength / dist * self.sensitivity;
    }
}

/// Lays out `rows` x `columns` microphone positions `spacing` apart at a
/// constant `height`, starting at the origin. Positions are produced row by
/// row, so `(a, b)` lands at index `a * columns + b`.
pub fn grid_positions(rows: usize, columns: usize, spacing: f64, height: f64) -> Vec<Point3> {
    let positions: Vec<Point3> = (0..rows)
        .flat_map(|a| {
            (0..columns).map(move |b| Point3::new(a as f64 * spacing, b as f64 * spacing, height))
        })
        .collect();
    info!(
        "{}x{} microphone array generated with spacing of {} at z-level {}",
        rows, columns, spacing, height
    );
    positions
}
