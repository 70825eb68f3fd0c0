//! Path geometry primitives

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use crate::units::{ChassisAcceleration, ChassisVelocity};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A position on the ground plane.
///
/// Straight-line moves only need the first coordinate, see [`Point::along`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Units: feet
    position_ft: Vector2<f64>,
}

/// A point on a path along with the motion limits that apply from it.
///
/// The limits bound the motion on the path segment which starts at this
/// point, and the velocity limit must also have been reached by the time the
/// chassis arrives at the point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub point: Point,

    /// Maximum velocity at and after this point.
    pub max_velocity: ChassisVelocity,

    /// Maximum acceleration (and deceleration) after this point.
    pub max_acceleration: ChassisAcceleration,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Point {
    /// Create a new point from its coordinates in feet.
    pub fn new(x_ft: f64, y_ft: f64) -> Self {
        Self {
            position_ft: Vector2::new(x_ft, y_ft),
        }
    }

    /// A point the given distance along a straight line.
    pub fn along(distance_ft: f64) -> Self {
        Self::new(distance_ft, 0.0)
    }

    pub fn x_ft(&self) -> f64 {
        self.position_ft[0]
    }

    pub fn y_ft(&self) -> f64 {
        self.position_ft[1]
    }

    /// Position vector of the point.
    ///
    /// Units: feet
    pub fn position_ft(&self) -> Vector2<f64> {
        self.position_ft
    }

    /// Straight line distance to another point.
    ///
    /// Units: feet
    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.position_ft - self.position_ft).norm()
    }

    /// True if both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.position_ft.iter().all(|c| c.is_finite())
    }
}

impl PathPoint {
    pub fn new(
        point: Point,
        max_velocity: ChassisVelocity,
        max_acceleration: ChassisAcceleration,
    ) -> Self {
        Self {
            point,
            max_velocity,
            max_acceleration,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(4.0, 5.0);

        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
        assert_eq!(Point::along(3.0).distance_to(&Point::along(-1.0)), 4.0);
    }

    #[test]
    fn test_finite() {
        assert!(Point::new(1.0, -2.0).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }
}
