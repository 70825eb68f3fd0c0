//! Chassis-frame kinematic units

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::unit_type;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

unit_type!(
    /// Linear velocity of the chassis along its path.
    ///
    /// Units: feet/second
    ChassisVelocity, fps, "ft/s"
);

unit_type!(
    /// Linear acceleration of the chassis along its path.
    ///
    /// Units: feet/second^2
    ChassisAcceleration, fpss, "ft/s^2"
);

unit_type!(
    /// Rate at which the chassis heading changes per foot travelled.
    ///
    /// Zero is straight ahead, negative values turn left and positive values
    /// turn right.
    ///
    /// Units: degrees/foot
    ChassisTurnRate, deg_per_ft, "deg/ft"
);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ChassisTurnRate {
    /// Get the path curvature described by this turn rate.
    ///
    /// Units: 1/feet
    pub fn curvature_ft(&self) -> f64 {
        self.deg_per_ft().to_radians()
    }

    /// True if this turn rate describes a straight line.
    pub fn is_straight(&self) -> bool {
        self.deg_per_ft() == 0.0
    }

    /// Radius of the circle traced by the chassis centre, or `None` for a
    /// straight line.
    ///
    /// Units: feet
    pub fn radius_ft(&self) -> Option<f64> {
        if self.is_straight() {
            None
        }
        else {
            Some(1.0 / self.curvature_ft().abs())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_turn_rate_radius() {
        // 360 degrees over a circumference of 72 feet
        let turn = ChassisTurnRate::new(5.0);
        let expected = 72.0 / std::f64::consts::TAU;

        assert!((turn.radius_ft().unwrap() - expected).abs() < 1e-9);
        assert!((ChassisTurnRate::new(-5.0).radius_ft().unwrap() - expected).abs() < 1e-9);
        assert!(ChassisTurnRate::ZERO.radius_ft().is_none());
    }
}
