//! # Path
//!
//! This module defines the path that a trajectory is generated along. A path
//! is an ordered sequence of [`PathPoint`]s, each carrying the velocity and
//! acceleration limits that apply from that point onwards.
//!
//! Once built a path never changes. It is traversed with [`PathCursor`]s,
//! which are nothing more than an index into the path, so any number of
//! independent traversals can run over the same path at once.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod point;
mod route;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
pub use point::*;
pub use route::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Segments no longer than this are stops.
///
/// Units: feet
pub const STOP_LENGTH_FT: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An ordered, immutable sequence of path points.
#[derive(Clone, Debug, Serialize)]
pub struct Path {
    points: Vec<PathPoint>,
}

/// A forward-only traversal over a [`Path`].
#[derive(Clone, Debug)]
pub struct PathCursor<'p> {
    path: &'p Path,

    /// Index of the point which `next` will return
    next_index: usize,
}

/// A segment between two neighbouring path points
#[derive(Clone, Copy, Debug)]
pub struct PathSegment {
    /// Index of the start point of the segment
    pub index: usize,

    /// The start point of the segment
    pub start: PathPoint,

    /// The end point of the segment
    pub end: PathPoint,

    /// The distance along the path at which the segment starts
    ///
    /// Units: feet
    pub start_dist_ft: f64,

    /// The length of the segment
    ///
    /// Units: feet
    pub length_ft: f64,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("Attempted to create a path from an empty sequence")]
    EmptyPath,

    #[error("Path point {0} has a non-finite coordinate")]
    NonFiniteCoordinate(usize),

    #[error("Path point {0} has an invalid maximum velocity")]
    InvalidVelocityCap(usize),

    #[error("Path point {0} has an invalid maximum acceleration")]
    InvalidAccelerationCap(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create a new path from a sequence of points.
    ///
    /// The sequence is validated before the path is built:
    ///  - it must not be empty,
    ///  - all coordinates must be finite,
    ///  - all acceleration limits must be finite and positive,
    ///  - all velocity limits must be finite and positive, except on the last
    ///    point where zero is accepted since motion always ends there.
    pub fn new(points: Vec<PathPoint>) -> Result<Self, PathError> {
        let path = Self { points };
        path.validate()?;
        Ok(path)
    }

    /// Check that the path is usable for trajectory generation.
    pub fn validate(&self) -> Result<(), PathError> {
        if self.points.is_empty() {
            return Err(PathError::EmptyPath);
        }

        let last = self.points.len() - 1;

        for (i, p) in self.points.iter().enumerate() {
            if !p.point.is_finite() {
                return Err(PathError::NonFiniteCoordinate(i));
            }

            let vel = p.max_velocity.fps();
            let vel_valid = vel.is_finite() && (vel > 0.0 || (i == last && vel == 0.0));
            if !vel_valid {
                return Err(PathError::InvalidVelocityCap(i));
            }

            let acc = p.max_acceleration.fpss();
            if !(acc.is_finite() && acc > 0.0) {
                return Err(PathError::InvalidAccelerationCap(i));
            }
        }

        Ok(())
    }

    /// Get a new cursor positioned before the first point.
    pub fn cursor(&self) -> PathCursor<'_> {
        PathCursor {
            path: self,
            next_index: 0,
        }
    }

    /// Get the number of points in the path
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// Get the point at the given index.
    pub fn get(&self, index: usize) -> Option<&PathPoint> {
        self.points.get(index)
    }

    /// Get all segments of the path in order.
    ///
    /// A path with a single point has no segments.
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut start_dist_ft = 0.0;

        self.points
            .windows(2)
            .enumerate()
            .map(|(index, pair)| {
                let length_ft = pair[0].point.distance_to(&pair[1].point);
                let seg = PathSegment {
                    index,
                    start: pair[0],
                    end: pair[1],
                    start_dist_ft,
                    length_ft,
                };
                start_dist_ft += length_ft;
                seg
            })
            .collect()
    }

    /// Return the length of the path in feet.
    ///
    /// The length is the sum of the lengths of all segments, so a single point
    /// path has zero length.
    pub fn length(&self) -> f64 {
        self.segments().iter().map(|s| s.length_ft).sum()
    }
}

impl<'p> PathCursor<'p> {
    /// Restart the traversal and return the first point of the path.
    pub fn first(&mut self) -> Option<&'p PathPoint> {
        self.next_index = 0;
        self.next()
    }

    /// Index of the point the next call to `next` will return.
    pub fn position(&self) -> usize {
        self.next_index
    }
}

impl<'p> Iterator for PathCursor<'p> {
    type Item = &'p PathPoint;

    /// Advance the cursor, returning `None` once the end of the path has been
    /// reached.
    fn next(&mut self) -> Option<Self::Item> {
        let point = self.path.points.get(self.next_index)?;
        self.next_index += 1;
        Some(point)
    }
}

impl PathSegment {
    /// The distance along the path at which the segment ends.
    ///
    /// Units: feet
    pub fn end_dist_ft(&self) -> f64 {
        self.start_dist_ft + self.length_ft
    }

    /// True if the segment has no length, i.e. represents a stop.
    pub fn is_stop(&self) -> bool {
        self.length_ft <= STOP_LENGTH_FT
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::units::{ChassisAcceleration, ChassisVelocity};

    /// Build a straight path through the given (distance, max velocity) pairs,
    /// all with the same acceleration limit.
    pub(crate) fn straight_path(points: &[(f64, f64)], max_acc: f64) -> Path {
        Path::new(
            points
                .iter()
                .map(|&(d, v)| {
                    PathPoint::new(
                        Point::along(d),
                        ChassisVelocity::new(v),
                        ChassisAcceleration::new(max_acc),
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_validation() {
        let ok = |d: f64, v: f64, a: f64| {
            PathPoint::new(
                Point::along(d),
                ChassisVelocity::new(v),
                ChassisAcceleration::new(a),
            )
        };

        assert_eq!(Path::new(vec![]).unwrap_err(), PathError::EmptyPath);
        assert_eq!(
            Path::new(vec![ok(0.0, 1.0, 1.0), ok(f64::NAN, 1.0, 1.0)]).unwrap_err(),
            PathError::NonFiniteCoordinate(1)
        );
        assert_eq!(
            Path::new(vec![ok(0.0, 0.0, 1.0), ok(1.0, 1.0, 1.0)]).unwrap_err(),
            PathError::InvalidVelocityCap(0)
        );
        assert_eq!(
            Path::new(vec![ok(0.0, 1.0, 1.0), ok(1.0, -1.0, 1.0)]).unwrap_err(),
            PathError::InvalidVelocityCap(1)
        );
        assert_eq!(
            Path::new(vec![ok(0.0, 1.0, 0.0)]).unwrap_err(),
            PathError::InvalidAccelerationCap(0)
        );

        // A zero velocity limit is fine on the last point
        assert!(Path::new(vec![ok(0.0, 1.0, 1.0), ok(1.0, 0.0, 1.0)]).is_ok());
    }

    #[test]
    fn test_cursors_are_independent() {
        let path = straight_path(&[(0.0, 1.0), (1.0, 1.0), (3.0, 1.0)], 1.0);

        let mut a = path.cursor();
        let mut b = path.cursor();

        assert_eq!(a.first().unwrap().point.x_ft(), 0.0);
        assert_eq!(a.next().unwrap().point.x_ft(), 1.0);
        assert_eq!(b.next().unwrap().point.x_ft(), 0.0);
        assert_eq!(a.next().unwrap().point.x_ft(), 3.0);
        assert!(a.next().is_none());
        assert!(a.next().is_none());
        assert_eq!(b.position(), 1);

        // Restarting goes back to the beginning
        assert_eq!(a.first().unwrap().point.x_ft(), 0.0);
        assert_eq!(a.count(), 2);
    }

    #[test]
    fn test_segments_and_length() {
        let path = Path::new(vec![
            PathPoint::new(Point::new(0.0, 0.0), ChassisVelocity::new(1.0), ChassisAcceleration::new(1.0)),
            PathPoint::new(Point::new(3.0, 4.0), ChassisVelocity::new(1.0), ChassisAcceleration::new(1.0)),
            PathPoint::new(Point::new(3.0, 4.0), ChassisVelocity::new(1.0), ChassisAcceleration::new(1.0)),
            PathPoint::new(Point::new(3.0, 6.0), ChassisVelocity::new(1.0), ChassisAcceleration::new(1.0)),
        ])
        .unwrap();

        let segs = path.segments();
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].length_ft, 5.0);
        assert!(segs[1].is_stop());
        assert_eq!(segs[2].start_dist_ft, 5.0);
        assert_eq!(segs[2].end_dist_ft(), 7.0);
        assert_eq!(path.length(), 7.0);

        assert_eq!(straight_path(&[(2.0, 1.0)], 1.0).length(), 0.0);
        assert!(straight_path(&[(2.0, 1.0)], 1.0).segments().is_empty());
    }
}
