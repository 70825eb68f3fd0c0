//! Parameters structure for drive systems

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::DriveError;
use crate::units::{ChassisAcceleration, ChassisVelocity, MotorAcceleration, MotorVelocity};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters common to every kind of drive system.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DriveParams {
    /// Name of the chassis the drive belongs to
    pub name: String,

    // ---- CAPABILITIES ----

    /// Maximum velocity of the chassis.
    ///
    /// Units: feet/second
    pub max_velocity: ChassisVelocity,

    /// Maximum acceleration (and deceleration) of the chassis.
    ///
    /// Units: feet/second^2
    pub max_acceleration: ChassisAcceleration,

    // ---- GEOMETRY ----

    /// Motor rotations needed to move the chassis by one foot.
    ///
    /// Units: rotations/foot
    pub motor_rot_per_ft: f64,

    // ---- CONTROL ----

    /// Period at which the motor controllers consume trajectory samples.
    ///
    /// Units: milliseconds
    pub iteration_period_ms: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveParams {
    /// Build the parameters from the motor limits of the drive.
    pub fn from_motor_limits(
        name: &str,
        max_motor_velocity: MotorVelocity,
        max_motor_acceleration: MotorAcceleration,
        motor_rot_per_ft: f64,
        iteration_period_ms: u32,
    ) -> Self {
        Self {
            name: String::from(name),
            max_velocity: max_motor_velocity.to_chassis(motor_rot_per_ft),
            max_acceleration: max_motor_acceleration.to_chassis(motor_rot_per_ft),
            motor_rot_per_ft,
            iteration_period_ms,
        }
    }

    /// Check that every limit is finite and positive.
    pub fn validate(&self) -> Result<(), DriveError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.max_velocity.fps()) {
            return Err(DriveError::InvalidMaxVelocity(self.max_velocity.fps()));
        }
        if !positive(self.max_acceleration.fpss()) {
            return Err(DriveError::InvalidMaxAcceleration(self.max_acceleration.fpss()));
        }
        if !positive(self.motor_rot_per_ft) {
            return Err(DriveError::InvalidRotPerFoot(self.motor_rot_per_ft));
        }
        if self.iteration_period_ms == 0 {
            return Err(DriveError::InvalidIterationPeriod);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_motor_limits() {
        let params = DriveParams::from_motor_limits(
            "test",
            MotorVelocity::new(600.0),
            MotorAcceleration::new(1200.0),
            5.0,
            10,
        );

        assert_eq!(params.max_velocity.fps(), 2.0);
        assert_eq!(params.max_acceleration.fpss(), 4.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let good = DriveParams::from_motor_limits(
            "test",
            MotorVelocity::new(600.0),
            MotorAcceleration::new(1200.0),
            5.0,
            10,
        );

        let mut p = good.clone();
        p.max_velocity = ChassisVelocity::new(-1.0);
        assert_eq!(p.validate(), Err(DriveError::InvalidMaxVelocity(-1.0)));

        let mut p = good.clone();
        p.max_acceleration = ChassisAcceleration::ZERO;
        assert_eq!(p.validate(), Err(DriveError::InvalidMaxAcceleration(0.0)));

        let mut p = good.clone();
        p.motor_rot_per_ft = f64::INFINITY;
        assert!(matches!(p.validate(), Err(DriveError::InvalidRotPerFoot(_))));

        let mut p = good;
        p.iteration_period_ms = 0;
        assert_eq!(p.validate(), Err(DriveError::InvalidIterationPeriod));
    }
}
