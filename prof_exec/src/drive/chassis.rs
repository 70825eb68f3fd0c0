//! Chassis, a named vehicle with a drive system

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{DriveSystem, MoveCommand, MovePlan};
use crate::{
    traj_gen::{TrajGen, TrajGenError},
    units::{ChassisAcceleration, ChassisTurnRate, ChassisVelocity},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A vehicle driven by some kind of drive system.
pub struct Chassis {
    drive: Box<dyn DriveSystem>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Chassis {
    pub fn new<D: DriveSystem + 'static>(drive: D) -> Self {
        Self {
            drive: Box::new(drive),
        }
    }

    /// The chassis name, as given in its drive parameters.
    pub fn name(&self) -> &str {
        self.drive.name()
    }

    pub fn drive(&self) -> &dyn DriveSystem {
        self.drive.as_ref()
    }

    /// Plan a move of the chassis.
    ///
    /// The chassis centre moves `distance_ft` along an arc of the given turn
    /// rate, at no more than the requested velocity and acceleration.
    pub fn move_by(
        &self,
        distance_ft: f64,
        turn_rate: ChassisTurnRate,
        velocity: ChassisVelocity,
        acceleration: ChassisAcceleration,
        traj_gen: &TrajGen,
    ) -> Result<MovePlan, TrajGenError> {
        let cmd = MoveCommand::new(distance_ft, turn_rate, velocity, acceleration);

        self.drive.plan_move(&cmd, traj_gen)
    }
}

impl std::fmt::Debug for Chassis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chassis")
            .field("name", &self.name())
            .field("max_velocity", &self.drive.max_velocity())
            .field("max_acceleration", &self.drive.max_acceleration())
            .finish()
    }
}
