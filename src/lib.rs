//! SignalTracker estimates where a sound came from inside a rectangular room.
//! A grid of microphones, usually mounted on the ceiling, each report how
//! loud the sound was. Louder means closer, so every reading puts the source
//! somewhere on a sphere around its microphone. Intersecting those spheres
//! three at a time and averaging the results gives the position, which is
//! then used to point an observer, such as a camera, at the sound.
//!
//! The pieces, from the bottom up:
//!
//! - [geometry]: points, distances, headings and three-sphere intersection
//! - [room]: the box everything has to fit in
//! - [microphone] and [sensor_array]: a simulated inverse-distance sensing
//!   model that produces readings through the [signal_source] trait
//! - [localizer]: the multilateration engine
//! - [orientation]: turning a position into a heading for the observer
//! - [scenario] and [tracker]: a whole run, configured from the command line
//!   or a RON file
//!
//! The `tracker` binary runs a single scenario and prints the result, the
//! `monitor` binary lets you move the signal around and watch the estimate
//! follow it.

#![warn(missing_docs)]
pub mod args;
pub mod geometry;
pub mod gui;
pub mod localizer;
pub mod microphone;
pub mod orientation;
pub mod parse;
pub mod room;
pub mod scenario;
pub mod sensor_array;
pub mod signal_source;
pub mod tracker;

pub use geometry::Point3;

/// An iterator over every combination of three distinct indices below `n`,
/// in lexicographic order. Yields nothing when `n < 3`.
#[derive(Debug, Clone)]
pub struct Triples {
    n: usize,
    next: Option<[usize; 3]>,
}

/// Start iterating over the `n choose 3` index combinations.
pub fn triples(n: usize) -> Triples {
    Triples {
        n,
        next: (n >= 3).then_some([0, 1, 2]),
    }
}

impl Iterator for Triples {
    type Item = [usize; 3];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let [i, j, k] = current;
        let n = self.n;
        self.next = if k + 1 < n {
            Some([i, j, k + 1])
        } else if j + 2 < n {
            Some([i, j + 1, j + 2])
        } else if i + 3 < n {
            Some([i + 1, i + 2, i + 3])
        } else {
            None
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_triples_below_three() {
        assert_eq!(triples(0).count(), 0);
        assert_eq!(triples(2).count(), 0);
    }

    #[test]
    fn triples_of_four() {
        let all: Vec<[usize; 3]> = triples(4).collect();
        assert_eq!(all, vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]]);
    }

    #[test]
    fn counts_are_binomial() {
        for n in 3..12 {
            assert_eq!(triples(n).count(), n * (n - 1) * (n - 2) / 6);
        }
    }

    #[test]
    fn triples_are_strictly_increasing() {
        assert!(triples(9).all(|[i, j, k]| i < j && j < k && k < 9));
    }
}
