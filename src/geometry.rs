//! The small amount of 3D geometry the tracker needs: a [Point3] value type,
//! distances, unit vectors, headings, and the intersection of three spheres.

use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    fmt,
    ops::{Add, Mul, Sub},
};

/// Two centers closer to collinear than this (relative to their spread) do
/// not span a plane.
const COLLINEAR_TOLERANCE: f64 = 1e-9;

/// An ordered triple of reals. Used for positions and for directions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// z coordinate
    pub z: f64,
}

impl Point3 {
    /// Make a point from its three coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product, treating both points as vectors from the origin.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product, treating both points as vectors from the origin.
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Euclidean length of the vector from the origin to this point.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// True if any coordinate is NaN.
    pub fn has_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Rounds every coordinate to `places` decimal places. Only meant for
    /// presenting results, never for feeding them back into a computation.
    pub fn rounded(&self, places: i32) -> Self {
        let scale = 10f64.powi(places);
        let round = |v: f64| (v * scale).round() / scale;
        Self {
            x: round(self.x),
            y: round(self.y),
            z: round(self.z),
        }
    }
}

impl Add for Point3 {
    type Output = Point3;
    fn add(self, rhs: Self) -> Self::Output {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    fn sub(self, rhs: Self) -> Self::Output {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;
    fn mul(self, rhs: f64) -> Self::Output {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Point3 { x, y, z }
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// The locus of points a given distance away from a microphone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Position of the microphone
    pub center: Point3,
    /// Estimated distance to the signal
    pub radius: f64,
}

/// Things that can go wrong in the geometry primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// Returned by [unit_vector] when both endpoints are the same point.
    DivisionByZero,

    /// Returned by [trilaterate] when the three spheres do not share a point,
    /// or when their centers do not span a plane.
    NoIntersection,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            GeometryError::DivisionByZero => Cow::from("division by zero: points coincide"),
            GeometryError::NoIntersection => Cow::from("the three spheres do not intersect"),
        };
        write!(f, "{}", msg)
    }
}

impl std::error::Error for GeometryError {}

/// Euclidean distance between two points.
pub fn distance(a: Point3, b: Point3) -> f64 {
    (a - b).norm()
}

/// The direction pointing from `to` towards `from`, with length one.
pub fn unit_vector(from: Point3, to: Point3) -> Result<Point3, GeometryError> {
    let dist = distance(from, to);
    if dist == 0.0 {
        return Err(GeometryError::DivisionByZero);
    }
    Ok((from - to) * (1.0 / dist))
}

/// Azimuth and elevation in degrees of a unit vector. Feeding this anything
/// that is not unit length may produce NaN.
pub fn heading_from_unit_vector(u: Point3) -> (f64, f64) {
    (u.x.acos().to_degrees(), u.z.asin().to_degrees())
}

/// Finds the two points shared by three spheres centered on `p1`, `p2` and
/// `p3`.
///
/// The problem is solved in a local frame with `p1` at the origin, `e_x`
/// pointing at `p2` and `p3` in the x-y plane. The two answers are mirror
/// images across the plane of the centers and are returned as
/// `(above, below)` with respect to `e_z = e_x × e_y`.
pub fn trilaterate(
    p1: Point3,
    p2: Point3,
    p3: Point3,
    r1: f64,
    r2: f64,
    r3: f64,
) -> Result<(Point3, Point3), GeometryError> {
    let p1p2 = p2 - p1;
    let d = p1p2.norm();
    if d == 0.0 {
        return Err(GeometryError::NoIntersection);
    }
    let e_x = p1p2 * (1.0 / d);

    let p1p3 = p3 - p1;
    let i = e_x.dot(&p1p3);
    let off_axis = p1p3 - e_x * i;
    let off_axis_len = off_axis.norm();
    if off_axis_len <= COLLINEAR_TOLERANCE * p1p3.norm() {
        return Err(GeometryError::NoIntersection);
    }
    let e_y = off_axis * (1.0 / off_axis_len);
    let e_z = e_x.cross(&e_y);
    let j = e_y.dot(&p1p3);

    let x = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let y = (r1 * r1 - r3 * r3 - 2.0 * i * x + i * i + j * j) / (2.0 * j);

    let z_squared = r1 * r1 - x * x - y * y;
    if z_squared < 0.0 {
        return Err(GeometryError::NoIntersection);
    }
    let z = z_squared.sqrt();

    let base = p1 + e_x * x + e_y * y;
    Ok((base + e_z * z, base - e_z * z))
}

/// [trilaterate] over three [Sphere]s.
pub fn intersect_spheres(
    a: &Sphere,
    b: &Sphere,
    c: &Sphere,
) -> Result<(Point3, Point3), GeometryError> {
    trilaterate(a.center, b.center, c.center, a.radius, b.radius, c.radius)
}
