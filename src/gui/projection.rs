use crate::geometry::Point3;
use crate::room::Room;
use crate::tracker::{Report, Tracker};

/// Which pair of axes a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Looking down from the ceiling, x against y
    Top,
    /// Looking in from the side, x against z
    Side,
}

impl Plane {
    /// Drops the axis this plane does not show.
    pub fn project(&self, p: &Point3) -> (f64, f64) {
        match self {
            Plane::Top => (p.x, p.y),
            Plane::Side => (p.x, p.z),
        }
    }

    /// Horizontal and vertical axis bounds that fit the room.
    pub fn bounds(&self, room: &Room) -> ([f64; 2], [f64; 2]) {
        let (w, h) = self.project(&room.far_corner());
        ([0.0, w], [0.0, h])
    }

    /// Horizontal and vertical axis titles.
    pub fn axis_titles(&self) -> (&'static str, &'static str) {
        match self {
            Plane::Top => ("X", "Y"),
            Plane::Side => ("X", "Z"),
        }
    }

    /// Chart title.
    pub fn title(&self) -> &'static str {
        match self {
            Plane::Top => " Top (x, y) ",
            Plane::Side => " Side (x, z) ",
        }
    }
}

/// The points of one tracker step flattened onto a [Plane], ready to be
/// handed to a chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// Microphone positions
    pub microphones: Vec<(f64, f64)>,
    /// The real signal
    pub actual: Vec<(f64, f64)>,
    /// The estimate, empty if there was none
    pub estimate: Vec<(f64, f64)>,
    /// The observer
    pub observer: Vec<(f64, f64)>,
}

impl Projection {
    /// Projects the tracker's current state, and the estimate from `report`
    /// if there is one.
    pub fn new(plane: Plane, tracker: &Tracker, report: Option<&Report>) -> Self {
        let flat = |p: &Point3| plane.project(p);
        Projection {
            microphones: tracker.microphone_positions().iter().map(flat).collect(),
            actual: vec![flat(&tracker.signal())],
            estimate: report
                .and_then(|r| r.estimate.position())
                .iter()
                .map(flat)
                .collect(),
            observer: vec![flat(&tracker.observer().position())],
        }
    }
}

/// Three evenly spaced tick labels from zero to `max`.
pub fn axis_labels(max: f64) -> Vec<String> {
    [0.0, max / 2.0, max]
        .iter()
        .map(|v| format!("{:.1}", v))
        .collect()
}
