//! Motor-frame kinematic units and conversions from the chassis frame

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{unit_type, ChassisAcceleration, ChassisVelocity, SECONDS_PER_MINUTE};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

unit_type!(
    /// Angular position of a drive motor.
    ///
    /// Units: rotations
    MotorPosition, rot, "rot"
);

unit_type!(
    /// Angular velocity of a drive motor.
    ///
    /// Units: rotations/minute
    MotorVelocity, rpm, "RPM"
);

unit_type!(
    /// Angular acceleration of a drive motor.
    ///
    /// Units: rotations/minute/second
    MotorAcceleration, rpm_per_s, "RPM/s"
);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotorPosition {
    /// Motor position reached after moving the chassis the given distance.
    pub fn from_distance_ft(distance_ft: f64, rot_per_ft: f64) -> Self {
        Self::new(distance_ft * rot_per_ft)
    }

    /// Chassis distance corresponding to this motor position.
    ///
    /// Units: feet
    pub fn to_distance_ft(&self, rot_per_ft: f64) -> f64 {
        self.rot() / rot_per_ft
    }
}

impl MotorVelocity {
    /// Motor velocity needed to move the chassis at the given velocity.
    pub fn from_chassis(velocity: ChassisVelocity, rot_per_ft: f64) -> Self {
        Self::new(velocity.fps() * SECONDS_PER_MINUTE * rot_per_ft)
    }

    /// Chassis velocity produced by this motor velocity.
    pub fn to_chassis(&self, rot_per_ft: f64) -> ChassisVelocity {
        ChassisVelocity::new(self.rpm() / SECONDS_PER_MINUTE / rot_per_ft)
    }
}

impl MotorAcceleration {
    /// Motor acceleration needed to accelerate the chassis at the given rate.
    pub fn from_chassis(acceleration: ChassisAcceleration, rot_per_ft: f64) -> Self {
        Self::new(acceleration.fpss() * SECONDS_PER_MINUTE * rot_per_ft)
    }

    /// Chassis acceleration produced by this motor acceleration.
    pub fn to_chassis(&self, rot_per_ft: f64) -> ChassisAcceleration {
        ChassisAcceleration::new(self.rpm_per_s() / SECONDS_PER_MINUTE / rot_per_ft)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chassis_to_motor() {
        // 850 rotations per foot at 5 ft/s is 4250 rotations per second
        let vel = MotorVelocity::from_chassis(ChassisVelocity::new(5.0), 850.0);
        assert!((vel.rpm() - 255_000.0).abs() < 1e-6);
        assert!((vel.to_chassis(850.0).fps() - 5.0).abs() < 1e-12);

        let acc = MotorAcceleration::from_chassis(ChassisAcceleration::new(2.0), 10.0);
        assert!((acc.rpm_per_s() - 1200.0).abs() < 1e-9);
        assert!((acc.to_chassis(10.0).fpss() - 2.0).abs() < 1e-12);

        let pos = MotorPosition::from_distance_ft(2.5, 4.0);
        assert_eq!(pos.rot(), 10.0);
        assert_eq!(pos.to_distance_ft(4.0), 2.5);
    }

    #[test]
    fn test_negative_values_are_preserved() {
        let vel = MotorVelocity::new(-34.56);
        assert_eq!(vel.rpm(), -34.56);
        assert!(vel.to_chassis(1.0).fps() < 0.0);
    }
}
