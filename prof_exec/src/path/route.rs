//! Routes of unconstrained way points

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::iter::FromIterator;

// Internal
use super::{Path, PathError, PathPoint, Point};
use crate::units::{ChassisAcceleration, ChassisVelocity};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A point the chassis must pass through, without any motion limits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WayPoint {
    pub point: Point,
}

/// An ordered list of way points.
///
/// A route is planned into a [`Path`] by applying motion limits to each way
/// point.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Route {
    way_points: Vec<WayPoint>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WayPoint {
    pub fn new(point: Point) -> Self {
        Self { point }
    }
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a way point to the end of the route.
    pub fn add_way_point(&mut self, way_point: WayPoint) {
        self.way_points.push(way_point);
    }

    pub fn way_points(&self) -> &[WayPoint] {
        &self.way_points
    }

    /// Plan a path through every way point with uniform motion limits.
    pub fn plan_path(
        &self,
        max_velocity: ChassisVelocity,
        max_acceleration: ChassisAcceleration,
    ) -> Result<Path, PathError> {
        Path::new(
            self.way_points
                .iter()
                .map(|wp| PathPoint::new(wp.point, max_velocity, max_acceleration))
                .collect(),
        )
    }
}

impl FromIterator<WayPoint> for Route {
    fn from_iter<I: IntoIterator<Item = WayPoint>>(iter: I) -> Self {
        Self {
            way_points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_plan_path() {
        let mut route = Route::new();
        route.add_way_point(WayPoint::new(Point::new(0.0, 0.0)));
        route.add_way_point(WayPoint::new(Point::new(0.0, 2.0)));
        route.add_way_point(WayPoint::new(Point::new(2.0, 2.0)));

        let path = route
            .plan_path(ChassisVelocity::new(4.0), ChassisAcceleration::new(10.0))
            .unwrap();

        assert_eq!(path.len(), 3);
        assert_eq!(path.length(), 4.0);
        assert!(path
            .points()
            .iter()
            .all(|p| p.max_velocity.fps() == 4.0 && p.max_acceleration.fpss() == 10.0));
    }

    #[test]
    fn test_empty_route_is_invalid() {
        let route: Route = std::iter::empty().collect();

        assert_eq!(
            route
                .plan_path(ChassisVelocity::new(1.0), ChassisAcceleration::new(1.0))
                .unwrap_err(),
            PathError::EmptyPath
        );
    }
}
