//! The board all microphones are plugged into. It has a fixed number of
//! ports, delivers signal events to its microphones, and hands out readings.

use crate::geometry::Point3;
use crate::microphone::Microphone;
use crate::signal_source::{Reading, SignalSource};

use log::{debug, warn};

/// A [SignalSource] backed by simulated [Microphone]s.
#[derive(Debug, Clone)]
pub struct SensorArray {
    capacity: usize,
    microphones: Vec<Microphone>,
}

impl SensorArray {
    /// Plug `microphones` into a board with `capacity` ports. If there are
    /// more microphones than ports, only the first `capacity - 1` are kept and
    /// the rest are dropped.
    pub fn new(capacity: usize, mut microphones: Vec<Microphone>) -> Self {
        if microphones.len() > capacity {
            let kept = capacity.saturating_sub(1);
            warn!(
                "Plugged in {} microphones into {} ports, reduced to {}",
                microphones.len(),
                capacity,
                kept
            );
            microphones.truncate(kept);
        }
        Self {
            capacity,
            microphones,
        }
    }

    /// Number of ports on the board.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The microphones that are plugged in, in port order.
    pub fn microphones(&self) -> &[Microphone] {
        &self.microphones
    }

    /// Positions of the plugged in microphones, in port order.
    pub fn positions(&self) -> Vec<Point3> {
        self.microphones.iter().map(Microphone::position).collect()
    }

    /// Emits a signal of `strength` at `source` to every microphone.
    pub fn broadcast(&mut self, source: Point3, strength: f64) {
        debug!(
            "Broadcasting signal at {} with strength {} to {} microphones",
            source,
            strength,
            self.microphones.len()
        );
        for mic in self.microphones.iter_mut() {
            mic.receive(source, strength);
        }
    }
}

impl SignalSource for SensorArray {
    fn poll_signals(&self) -> Vec<Reading> {
        self.microphones.iter().map(Microphone::volume).collect()
    }

    fn num_active_mics(&self) -> usize {
        self.microphones.len()
    }
}
