//! Pointing an observer at an estimated position.

use crate::geometry::{heading_from_unit_vector, unit_vector, GeometryError, Point3};

use log::info;
use std::fmt;

/// A direction in degrees. `azimuth` is the angle away from the +x axis and
/// `elevation` the angle above the horizontal plane.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Heading {
    /// Degrees away from +x, 0 to 180
    pub azimuth: f64,
    /// Degrees above horizontal, -90 to 90
    pub elevation: f64,
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alpha: {:.2}, beta: {:.2}",
            self.azimuth, self.elevation
        )
    }
}

/// The heading an observer at `observer` has to face to look at `target`.
pub fn heading_to(observer: Point3, target: Point3) -> Result<Heading, GeometryError> {
    let (azimuth, elevation) = heading_from_unit_vector(unit_vector(target, observer)?);
    Ok(Heading { azimuth, elevation })
}

/// Something that sits at a fixed position and can be turned to face things,
/// like a camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    position: Point3,
    heading: Heading,
}

impl Observer {
    /// An observer at `position` looking along +x.
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            heading: Heading::default(),
        }
    }

    /// Where the observer is.
    pub fn position(&self) -> Point3 {
        self.position
    }

    /// Where the observer is looking.
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Turns the observer to face `target` and returns the new heading. If
    /// the target is the observer's own position there is no direction to
    /// face: the heading is kept and [GeometryError::DivisionByZero] is
    /// returned.
    pub fn reorient(&mut self, target: Point3) -> Result<Heading, GeometryError> {
        let new_heading = heading_to(self.position, target)?;
        info!(
            "Redirecting observer from orientation {} to orientation {}",
            self.heading, new_heading
        );
        self.heading = new_heading;
        Ok(new_heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn heading_along_the_floor() {
        let h = heading_to(Point3::new(0.0, 0.0, 2.0), Point3::new(6.0, 6.0, 2.0)).unwrap();
        assert!((h.azimuth - 45.0).abs() < EPS);
        assert!(h.elevation.abs() < EPS);
    }

    #[test]
    fn heading_straight_up() {
        let h = heading_to(Point3::new(1.0, 1.0, 0.0), Point3::new(1.0, 1.0, 4.0)).unwrap();
        assert!((h.azimuth - 90.0).abs() < EPS);
        assert!((h.elevation - 90.0).abs() < EPS);
    }

    #[test]
    fn heading_backwards_and_down() {
        let h = heading_to(Point3::new(5.0, 0.0, 5.0), Point3::new(0.0, 0.0, 0.0)).unwrap();
        assert!((h.azimuth - 135.0).abs() < EPS);
        assert!((h.elevation + 45.0).abs() < EPS);
    }

    #[test]
    fn heading_to_self_fails() {
        let p = Point3::new(3.0, 3.0, 3.0);
        assert_eq!(heading_to(p, p), Err(GeometryError::DivisionByZero));
    }

    #[test]
    fn observer_remembers_heading() {
        let mut camera = Observer::new(Point3::new(0.0, 0.0, 2.0));
        assert_eq!(camera.heading(), Heading::default());

        let h = camera.reorient(Point3::new(6.0, 6.0, 2.0)).unwrap();
        assert_eq!(camera.heading(), h);

        assert!(camera.reorient(Point3::new(0.0, 0.0, 2.0)).is_err());
        assert_eq!(camera.heading(), h);
    }
}
