//! Multilateration: turning per-microphone readings into a position.
//!
//! Each reading is converted into a distance, which puts the signal somewhere
//! on a sphere around its microphone. Every combination of three spheres is
//! intersected, which yields two mirror-image candidates per combination.
//! Candidates are sorted into a lower and an upper point by height, both sets
//! are averaged, and the average that lies inside the room is the estimate.

use crate::geometry::{intersect_spheres, Point3, Sphere};
use crate::room::Room;
use crate::signal_source::{Reading, SignalSource};
use crate::triples;

use log::{debug, info};
use std::fmt;

/// How the localizer decides what volume the signal was emitted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VolumeEstimator {
    /// Trust the signal strength handed to the localizer.
    #[default]
    KnownStrength,

    /// Predict the strength from the readings themselves as
    /// `mean(readings) / sensitivity`. This is uncalibrated and generally
    /// lands far from the real strength.
    MeanReading,
}

/// The two mirror-image solutions of one three-sphere intersection, ordered
/// so `lower.z <= upper.z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionCandidate {
    /// The solution with the smaller z coordinate
    pub lower: Point3,
    /// The solution with the larger z coordinate
    pub upper: Point3,
}

impl From<(Point3, Point3)> for IntersectionCandidate {
    fn from((a, b): (Point3, Point3)) -> Self {
        if a.z > b.z {
            IntersectionCandidate { lower: b, upper: a }
        } else {
            IntersectionCandidate { lower: a, upper: b }
        }
    }
}

/// The outcome of a localization that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Localization {
    /// One of the averaged candidates is inside the room.
    Found(Point3),

    /// Neither averaged candidate is inside the room. Both are kept so the
    /// caller can see what was rejected.
    NotFound {
        /// Mean of all lower candidates
        lower: Point3,
        /// Mean of all upper candidates
        upper: Point3,
    },
}

impl Localization {
    /// The position, if one was found.
    pub fn position(&self) -> Option<Point3> {
        match self {
            Localization::Found(p) => Some(*p),
            Localization::NotFound { .. } => None,
        }
    }
}

impl fmt::Display for Localization {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Localization::Found(p) => write!(f, "{}", p.rounded(2)),
            Localization::NotFound { .. } => write!(f, "not found"),
        }
    }
}

/// Reasons a localization can be abandoned.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalizerError {
    /// The localizer is missing something it needs before it can run.
    Configuration(String),

    /// A microphone reported something that is not a positive reading.
    Sensor {
        /// Port of the offending microphone
        index: usize,
        /// What it reported
        reading: Reading,
    },

    /// Fewer than three microphones means there are no spheres to intersect.
    InsufficientMicrophones {
        /// How many microphones were active
        active: usize,
    },

    /// Every combination of spheres failed to intersect.
    NoValidIntersections,
}

impl fmt::Display for LocalizerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use LocalizerError as LE;
        match self {
            LE::Configuration(msg) => write!(f, "configuration error: {}", msg),
            LE::Sensor { index, reading } => write!(
                f,
                "sensor error: non-positive reading at index {}, got {}",
                index, reading
            ),
            LE::InsufficientMicrophones { active } => write!(
                f,
                "at least 3 active microphones are needed, got {}",
                active
            ),
            LE::NoValidIntersections => write!(f, "no combination of microphones intersected"),
        }
    }
}

impl std::error::Error for LocalizerError {}

/// Running sums of candidate points.
#[derive(Debug, Default, Clone, Copy)]
struct CandidateSums {
    lower: Point3,
    upper: Point3,
    count: usize,
}

impl CandidateSums {
    fn add(self, candidate: IntersectionCandidate) -> Self {
        CandidateSums {
            lower: self.lower + candidate.lower,
            upper: self.upper + candidate.upper,
            count: self.count + 1,
        }
    }

    fn means(&self) -> Option<(Point3, Point3)> {
        if self.count == 0 {
            return None;
        }
        let inv = 1.0 / self.count as f64;
        Some((self.lower * inv, self.upper * inv))
    }
}

/// Estimates where a signal came from, given the readings of microphones at
/// known positions inside a [Room].
#[derive(Debug, Clone)]
pub struct Localizer {
    room: Room,
    sensitivity: f64,
    mic_positions: Vec<Point3>,
    estimator: VolumeEstimator,
}

impl Localizer {
    /// A localizer for `room` with no sensitivity and no microphone positions
    /// set yet.
    pub fn new(room: Room) -> Self {
        Self {
            room,
            sensitivity: 0.0,
            mic_positions: Vec::new(),
            estimator: VolumeEstimator::default(),
        }
    }

    /// Sets the sensitivity shared by every microphone. This should match
    /// the sensitivity the microphones were built with.
    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.sensitivity = sensitivity;
    }

    /// Sets the microphone positions, in the same order as the readings.
    pub fn set_mic_positions(&mut self, positions: Vec<Point3>) {
        self.mic_positions = positions;
    }

    /// Swap out how the emitted volume is estimated.
    pub fn set_estimator(&mut self, estimator: VolumeEstimator) {
        self.estimator = estimator;
    }

    /// The microphone positions in use.
    pub fn mic_positions(&self) -> &[Point3] {
        &self.mic_positions
    }

    /// The room estimates are constrained to.
    pub fn room(&self) -> &Room {
        &self.room
    }

    fn emitted_volume(&self, readings: &[Reading], known_strength: f64) -> f64 {
        match self.estimator {
            VolumeEstimator::KnownStrength => known_strength,
            VolumeEstimator::MeanReading => {
                let mean = readings.iter().sum::<f64>() / readings.len() as f64;
                mean / self.sensitivity
            }
        }
    }

    /// Converts every reading into a distance from its microphone.
    pub fn estimate_distances(
        &self,
        readings: &[Reading],
        known_strength: f64,
    ) -> Result<Vec<f64>, LocalizerError> {
        if self.sensitivity.is_nan() || self.sensitivity <= 0.0 {
            return Err(LocalizerError::Configuration(
                "sensitivity not set".to_owned(),
            ));
        }
        if self.mic_positions.len() < readings.len() {
            return Err(LocalizerError::Configuration(format!(
                "missing position data, got {} positions and {} active microphones",
                self.mic_positions.len(),
                readings.len()
            )));
        }
        if let Some((index, &reading)) = readings
            .iter()
            .enumerate()
            .find(|(_, r)| r.is_nan() || **r <= 0.0)
        {
            return Err(LocalizerError::Sensor { index, reading });
        }

        let volume = self.emitted_volume(readings, known_strength);
        Ok(readings
            .iter()
            .map(|reading| volume / reading * self.sensitivity)
            .collect())
    }

    /// Estimates the position of the signal behind `readings`.
    ///
    /// Combinations of microphones whose spheres do not meet are skipped.
    /// Getting [Localization::NotFound] back is not an error, it means the
    /// spheres met somewhere outside the room.
    pub fn estimate_position(
        &self,
        readings: &[Reading],
        known_strength: f64,
    ) -> Result<Localization, LocalizerError> {
        let distances = self.estimate_distances(readings, known_strength)?;
        if distances.len() < 3 {
            return Err(LocalizerError::InsufficientMicrophones {
                active: distances.len(),
            });
        }

        let spheres: Vec<Sphere> = self
            .mic_positions
            .iter()
            .zip(distances)
            .map(|(&center, radius)| Sphere { center, radius })
            .collect();

        let sums = intersection_candidates(&spheres)
            .fold(CandidateSums::default(), CandidateSums::add);
        let (lower, upper) = sums.means().ok_or(LocalizerError::NoValidIntersections)?;
        info!(
            "Averaged {} candidates: lower {}, upper {}",
            sums.count, lower, upper
        );

        Ok(resolve_in_room(&self.room, lower, upper))
    }

    /// Polls `source` and estimates the position behind its readings.
    pub fn locate<S: SignalSource>(
        &self,
        source: &S,
        known_strength: f64,
    ) -> Result<Localization, LocalizerError> {
        let active = source.num_active_mics();
        if self.mic_positions.len() < active {
            return Err(LocalizerError::Configuration(format!(
                "missing position data, got {} positions and {} active microphones",
                self.mic_positions.len(),
                active
            )));
        }
        self.estimate_position(&source.poll_signals(), known_strength)
    }
}

/// Intersects every combination of three `spheres`, skipping combinations
/// that do not meet or that produce NaN coordinates.
pub fn intersection_candidates(
    spheres: &[Sphere],
) -> impl Iterator<Item = IntersectionCandidate> + '_ {
    triples(spheres.len()).filter_map(move |[a, b, c]| {
        match intersect_spheres(&spheres[a], &spheres[b], &spheres[c]) {
            Ok((p, q)) if p.has_nan() || q.has_nan() => {
                debug!("Skipping microphones ({}, {}, {}): NaN intersection", a, b, c);
                None
            }
            Ok(pair) => {
                let candidate = IntersectionCandidate::from(pair);
                debug!(
                    "Microphones ({}, {}, {}) meet at {} and {}",
                    a, b, c, candidate.lower, candidate.upper
                );
                Some(candidate)
            }
            Err(e) => {
                debug!("Skipping microphones ({}, {}, {}): {}", a, b, c, e);
                None
            }
        }
    })
}

/// Picks whichever of `lower` and `upper` lies inside `room`. When both do,
/// `upper` is picked.
pub fn resolve_in_room(room: &Room, lower: Point3, upper: Point3) -> Localization {
    [lower, upper]
        .into_iter()
        .filter(|p| room.contains(p))
        .last()
        .map(Localization::Found)
        .unwrap_or(Localization::NotFound { lower, upper })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance;
    use crate::microphone::grid_positions;

    fn room() -> Room {
        Room::new(10.0, 10.0, 5.0).unwrap()
    }

    fn localizer(positions: Vec<Point3>, sensitivity: f64) -> Localizer {
        let mut loc = Localizer::new(room());
        loc.set_sensitivity(sensitivity);
        loc.set_mic_positions(positions);
        loc
    }

    /// Readings an inverse-distance microphone would report.
    fn synthetic_readings(
        positions: &[Point3],
        source: Point3,
        strength: f64,
        sensitivity: f64,
    ) -> Vec<Reading> {
        positions
            .iter()
            .map(|&p| strength / distance(p, source) * sensitivity)
            .collect()
    }

    fn diagonal(room: &Room) -> f64 {
        room.far_corner().norm()
    }

    #[test]
    fn nan_radii_produce_no_candidates() {
        let spheres: Vec<Sphere> = grid_positions(2, 2, 5.0, 5.0)
            .into_iter()
            .map(|center| Sphere {
                center,
                radius: f64::NAN,
            })
            .collect();
        assert_eq!(intersection_candidates(&spheres).count(), 0);
    }

    #[test]
    fn nan_strength_finds_nothing() {
        let loc = localizer(grid_positions(3, 3, 5.0, 5.0), 10.0);
        assert_eq!(
            loc.estimate_position(&[1.0; 9], f64::NAN),
            Err(LocalizerError::NoValidIntersections)
        );
    }

    #[test]
    fn distances_invert_the_readings() {
        let loc = localizer(grid_positions(2, 2, 5.0, 5.0), 10.0);
        let distances = loc.estimate_distances(&[10.0, 5.0, 2.0, 30.0], 3.0).unwrap();
        let expected = [3.0, 6.0, 15.0, 1.0];
        for (d, e) in distances.iter().zip(expected) {
            assert!((d - e).abs() < 1e-12);
        }
    }

    #[test]
    fn distances_need_sensitivity() {
        let loc = localizer(grid_positions(2, 2, 5.0, 5.0), 0.0);
        assert_eq!(
            loc.estimate_distances(&[1.0, 1.0, 1.0, 1.0], 3.0),
            Err(LocalizerError::Configuration("sensitivity not set".to_owned()))
        );
    }

    #[test]
    fn distances_need_a_position_per_reading() {
        let loc = localizer(grid_positions(1, 2, 5.0, 5.0), 10.0);
        let res = loc.estimate_distances(&[1.0, 1.0, 1.0], 3.0);
        assert!(matches!(res, Err(LocalizerError::Configuration(msg)) if msg.starts_with("missing position data")));
    }

    #[test]
    fn distances_reject_non_positive_readings() {
        let loc = localizer(grid_positions(2, 2, 5.0, 5.0), 10.0);
        assert_eq!(
            loc.estimate_distances(&[1.0, 2.0, 0.0, -1.0], 3.0),
            Err(LocalizerError::Sensor {
                index: 2,
                reading: 0.0
            })
        );
        assert_eq!(
            loc.estimate_distances(&[-4.0, 2.0, 1.0, 1.0], 3.0),
            Err(LocalizerError::Sensor {
                index: 0,
                reading: -4.0
            })
        );
    }

    #[test]
    fn mean_reading_estimator_predicts_its_own_volume() {
        let mut loc = localizer(grid_positions(2, 2, 5.0, 5.0), 10.0);
        loc.set_estimator(VolumeEstimator::MeanReading);
        // mean is 5, so the predicted volume is 0.5 no matter the strength
        let distances = loc.estimate_distances(&[2.0, 4.0, 6.0, 8.0], 3.0).unwrap();
        assert!((distances[0] - 2.5).abs() < 1e-12);
        assert!((distances[3] - 0.625).abs() < 1e-12);
    }

    #[test]
    fn recovers_signal_under_ceiling_grid() {
        let positions = grid_positions(3, 3, 5.0, 5.0);
        let source = Point3::new(6.0, 6.0, 2.0);
        let readings = synthetic_readings(&positions, source, 3.0, 10.0);
        assert!(readings.iter().all(|&r| r > 0.0));

        let loc = localizer(positions, 10.0);
        let estimate = loc.estimate_position(&readings, 3.0).unwrap();
        let found = estimate.position().expect("signal should be inside the room");
        assert!(distance(found, source) < 0.01 * diagonal(&room()));
    }

    #[test]
    fn recovers_signal_with_non_coplanar_microphones() {
        let positions = vec![
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(10.0, 0.0, 5.0),
            Point3::new(0.0, 10.0, 5.0),
            Point3::new(10.0, 10.0, 0.0),
        ];
        let source = Point3::new(3.0, 4.0, 1.0);
        let readings = synthetic_readings(&positions, source, 2.0, 5.0);

        let loc = localizer(positions, 5.0);
        let found = loc
            .estimate_position(&readings, 2.0)
            .unwrap()
            .position()
            .unwrap();
        assert!(distance(found, source) < 0.01 * diagonal(&room()));
    }

    #[test]
    fn two_microphones_are_not_enough() {
        let positions = grid_positions(1, 2, 5.0, 5.0);
        let readings = synthetic_readings(&positions, Point3::new(6.0, 6.0, 2.0), 3.0, 10.0);
        let loc = localizer(positions, 10.0);
        assert_eq!(
            loc.estimate_position(&readings, 3.0),
            Err(LocalizerError::InsufficientMicrophones { active: 2 })
        );
    }

    #[test]
    fn collinear_microphones_never_intersect() {
        let positions = grid_positions(1, 3, 5.0, 5.0);
        let readings = synthetic_readings(&positions, Point3::new(6.0, 6.0, 2.0), 3.0, 10.0);
        let loc = localizer(positions, 10.0);
        assert_eq!(
            loc.estimate_position(&readings, 3.0),
            Err(LocalizerError::NoValidIntersections)
        );
    }

    #[test]
    fn spheres_that_miss_each_other_are_skipped() {
        let loc = localizer(grid_positions(2, 2, 5.0, 5.0), 10.0);
        // every microphone thinks the signal is a tenth of a unit away
        assert_eq!(
            loc.estimate_position(&[300.0; 4], 3.0),
            Err(LocalizerError::NoValidIntersections)
        );
    }

    #[test]
    fn signal_outside_the_room_is_not_found() {
        let positions = grid_positions(3, 3, 5.0, 5.0);
        let readings = synthetic_readings(&positions, Point3::new(12.0, 6.0, 2.0), 3.0, 10.0);
        let loc = localizer(positions, 10.0);
        let estimate = loc.estimate_position(&readings, 3.0).unwrap();
        assert!(matches!(estimate, Localization::NotFound { .. }));
        assert_eq!(estimate.position(), None);
        assert_eq!(estimate.to_string(), "not found");
    }

    #[test]
    fn upper_wins_when_both_are_inside() {
        let positions = grid_positions(3, 3, 5.0, 2.5);
        let readings = synthetic_readings(&positions, Point3::new(6.0, 6.0, 1.0), 3.0, 10.0);
        let loc = localizer(positions, 10.0);
        let found = loc
            .estimate_position(&readings, 3.0)
            .unwrap()
            .position()
            .unwrap();
        assert!(distance(found, Point3::new(6.0, 6.0, 4.0)) < 1e-6);
    }

    #[test]
    fn resolve_prefers_the_point_inside() {
        let room = room();
        let lower = Point3::new(6.0, 6.0, 2.0);
        let upper = Point3::new(6.0, 6.0, 8.0);
        assert_eq!(resolve_in_room(&room, lower, upper), Localization::Found(lower));
        assert_eq!(
            resolve_in_room(&room, Point3::new(6.0, 6.0, -1.0), Point3::new(6.0, 6.0, 3.0)),
            Localization::Found(Point3::new(6.0, 6.0, 3.0))
        );
        let lower = Point3::new(6.0, 6.0, -1.0);
        assert_eq!(
            resolve_in_room(&room, lower, upper),
            Localization::NotFound { lower, upper }
        );
    }

    #[test]
    fn candidates_are_sorted_by_height() {
        let a = Point3::new(1.0, 1.0, 4.0);
        let b = Point3::new(1.0, 1.0, -4.0);
        let candidate = IntersectionCandidate::from((a, b));
        assert_eq!(candidate.lower, b);
        assert_eq!(candidate.upper, a);
        assert_eq!(IntersectionCandidate::from((b, a)), candidate);
    }

    #[test]
    fn locate_polls_the_source() {
        use crate::microphone::Microphone;
        use crate::sensor_array::SensorArray;

        let positions = grid_positions(3, 3, 5.0, 5.0);
        let mut array = SensorArray::new(
            99,
            positions.iter().map(|&p| Microphone::new(p, 10.0)).collect(),
        );
        let source = Point3::new(2.0, 7.5, 3.0);
        array.broadcast(source, 3.0);

        let loc = localizer(positions.clone(), 10.0);
        let found = loc.locate(&array, 3.0).unwrap().position().unwrap();
        assert!(distance(found, source) < 0.01 * diagonal(&room()));

        let short = localizer(positions[..4].to_vec(), 10.0);
        assert!(matches!(
            short.locate(&array, 3.0),
            Err(LocalizerError::Configuration(_))
        ));
    }
}
