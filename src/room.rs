//! The room the microphones and the signal live in: an axis-aligned box with
//! one corner at the origin.

use crate::geometry::Point3;
use std::fmt;

/// An axis-aligned box spanning `(0, 0, 0)` to `(x, y, z)`, both corners
/// included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    x: f64,
    y: f64,
    z: f64,
}

/// Returned when a [Room] is built with a dimension that is not strictly
/// positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomError {
    /// Which axis was bad, `'x'`, `'y'` or `'z'`
    pub axis: char,
    /// The rejected value
    pub value: f64,
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "room dimension {} must be positive, got {}",
            self.axis, self.value
        )
    }
}

impl std::error::Error for RoomError {}

impl Room {
    /// Build a room, rejecting any dimension that is not strictly positive
    /// (NaN included).
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, RoomError> {
        for (axis, value) in [('x', x), ('y', y), ('z', z)] {
            if value.is_nan() || value <= 0.0 {
                return Err(RoomError { axis, value });
            }
        }
        Ok(Room { x, y, z })
    }

    /// Extent of the room along x.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Extent of the room along y.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Extent of the room along z.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// The corner opposite the origin.
    pub fn far_corner(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }

    /// Whether `p` lies inside the room, walls included.
    pub fn contains(&self, p: &Point3) -> bool {
        (0.0..=self.x).contains(&p.x)
            && (0.0..=self.y).contains(&p.y)
            && (0.0..=self.z).contains(&p.z)
    }

    /// Whether every one of `points` lies inside the room.
    pub fn contains_all<'a>(&self, points: impl IntoIterator<Item = &'a Point3>) -> bool {
        points.into_iter().all(|p| self.contains(p))
    }
}
