//! # Drive system module
//!
//! A drive system is the set of motors which move the chassis, along with the
//! limits those motors impose on the chassis' motion. Every drive system can
//! report its limits in chassis units (feet, feet/second, ...) and in motor
//! units (rotations, RPM, ...), and knows how to turn a high level
//! [`MoveCommand`] into trajectories for each of its motors.
//!
//! Drive systems are read-only once built. The trajectory generator only ever
//! borrows them, so one drive can be shared by many concurrent generations.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod chassis;
mod params;
mod tank;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
pub use chassis::*;
pub use params::DriveParams;
pub use tank::*;

use crate::{
    traj_gen::{TrajGen, TrajGenError, Trajectory},
    units::{
        ChassisAcceleration, ChassisTurnRate, ChassisVelocity, MotorAcceleration, MotorVelocity,
    },
};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A drive system moving a chassis.
pub trait DriveSystem: Send + Sync {
    /// The parameters shared by all drive systems.
    fn params(&self) -> &DriveParams;

    /// Plan the trajectories of each side of the drive for a move.
    fn plan_move(&self, cmd: &MoveCommand, traj_gen: &TrajGen) -> Result<MovePlan, TrajGenError>;

    /// Check that the drive can be used to generate trajectories.
    fn validate(&self) -> Result<(), DriveError> {
        self.params().validate()
    }

    fn name(&self) -> &str {
        &self.params().name
    }

    fn max_velocity(&self) -> ChassisVelocity {
        self.params().max_velocity
    }

    fn max_acceleration(&self) -> ChassisAcceleration {
        self.params().max_acceleration
    }

    /// Units: rotations/foot
    fn motor_rot_per_movement_foot(&self) -> f64 {
        self.params().motor_rot_per_ft
    }

    /// Units: milliseconds
    fn trajectory_iteration_period_ms(&self) -> u32 {
        self.params().iteration_period_ms
    }

    /// Maximum velocity of the drive's motors.
    fn max_motor_velocity(&self) -> MotorVelocity {
        MotorVelocity::from_chassis(self.max_velocity(), self.motor_rot_per_movement_foot())
    }

    /// Maximum acceleration of the drive's motors.
    fn max_motor_acceleration(&self) -> MotorAcceleration {
        MotorAcceleration::from_chassis(
            self.max_acceleration(),
            self.motor_rot_per_movement_foot(),
        )
    }
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A move of the chassis along a circular arc (or a straight line).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    /// Distance the centre of the chassis travels. Negative distances drive
    /// backwards.
    ///
    /// Units: feet
    pub distance_ft: f64,

    /// Rate of turn, positive to the right. Zero moves in a straight line.
    pub turn_rate: ChassisTurnRate,

    /// Requested velocity of the chassis centre.
    pub velocity: ChassisVelocity,

    /// Requested acceleration of the chassis centre.
    pub acceleration: ChassisAcceleration,
}

/// Trajectories for each side of a two sided drive.
///
/// Both trajectories share the same timing, sample for sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    pub left: Trajectory,
    pub right: Trajectory,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DriveError {
    #[error("Maximum velocity must be finite and positive, found {0} ft/s")]
    InvalidMaxVelocity(f64),

    #[error("Maximum acceleration must be finite and positive, found {0} ft/s^2")]
    InvalidMaxAcceleration(f64),

    #[error("Motor rotations per foot must be finite and positive, found {0}")]
    InvalidRotPerFoot(f64),

    #[error("The trajectory iteration period must be at least 1 ms")]
    InvalidIterationPeriod,

    #[error("Drive width must be finite and positive, found {0} ft")]
    InvalidWidth(f64),

    #[error("Invalid move command: {0}")]
    InvalidMoveCommand(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MoveCommand {
    pub fn new(
        distance_ft: f64,
        turn_rate: ChassisTurnRate,
        velocity: ChassisVelocity,
        acceleration: ChassisAcceleration,
    ) -> Self {
        Self {
            distance_ft,
            turn_rate,
            velocity,
            acceleration,
        }
    }

    /// Check that the command can be executed.
    pub fn validate(&self) -> Result<(), DriveError> {
        if !self.distance_ft.is_finite() {
            return Err(DriveError::InvalidMoveCommand(format!(
                "distance must be finite, found {} ft",
                self.distance_ft
            )));
        }
        if !self.turn_rate.is_finite() {
            return Err(DriveError::InvalidMoveCommand(format!(
                "turn rate must be finite, found {}",
                self.turn_rate
            )));
        }
        if !(self.velocity.is_finite() && self.velocity.fps() > 0.0) {
            return Err(DriveError::InvalidMoveCommand(format!(
                "velocity must be finite and positive, found {}",
                self.velocity
            )));
        }
        if !(self.acceleration.is_finite() && self.acceleration.fpss() > 0.0) {
            return Err(DriveError::InvalidMoveCommand(format!(
                "acceleration must be finite and positive, found {}",
                self.acceleration
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_move_command_validate() {
        let ok = MoveCommand::new(
            -3.0,
            ChassisTurnRate::new(2.0),
            ChassisVelocity::new(1.0),
            ChassisAcceleration::new(1.0),
        );
        assert!(ok.validate().is_ok());

        let mut bad = ok;
        bad.velocity = ChassisVelocity::ZERO;
        assert!(matches!(bad.validate(), Err(DriveError::InvalidMoveCommand(_))));

        let mut bad = ok;
        bad.distance_ft = f64::NAN;
        assert!(bad.validate().is_err());

        let mut bad = ok;
        bad.turn_rate = ChassisTurnRate::new(f64::INFINITY);
        assert!(bad.validate().is_err());
    }
}
